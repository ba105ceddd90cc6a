//! LLM Provider Clients and Abstractions
//!
//! - [`LLMClient`] - The trait every model client implements
//! - [`OpenAIClient`] - Client for OpenAI-compatible chat-completions APIs
//!   (OpenAI, OpenRouter, local gateways)
//! - [`ToolCoordinator`] - Function-calling loop over a tool registry

/// Core LLM client trait and response types.
pub mod client;
/// Multi-turn tool calling loop.
pub mod coordinator;
/// OpenAI-compatible chat-completions client.
pub mod openai;

pub use client::{LLMClient, LLMResponse};
pub use coordinator::{CoordinatorResult, FinishReason, ToolCallingConfig, ToolCoordinator};
pub use openai::OpenAIClient;
