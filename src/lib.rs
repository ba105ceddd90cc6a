//! # ODS - Open Deep Search tool server
//!
//! An MCP tool server exposing two tools over streamable HTTP, plus the
//! pieces needed to drive it from a tool-calling agent.
//!
//! - `search_tool` answers a question from web search results (Serper or
//!   SearXNG), optionally reading each source page and asking a model to
//!   answer from the numbered sources.
//! - `calculate` sends a query to Wolfram|Alpha, retries transient failures
//!   and reduces the pod response to one plain-text answer.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ods::compute::{ComputeTool, WolframAlphaClient};
//! use std::sync::Arc;
//!
//! let client = WolframAlphaClient::new(std::env::var("WOLFRAM_APP_ID")?)?;
//! let tool = ComputeTool::new(Arc::new(client));
//! println!("{}", tool.compute("integrate x^2 from 0 to 3").await?);
//! ```
//!
//! ### Driving the server from an agent
//!
//! ```rust,ignore
//! use ods::{llm::OpenAIClient, tools::McpConnection, ToolCoordinator};
//! use std::sync::Arc;
//!
//! let connection = McpConnection::connect("http://127.0.0.1:7860/mcp").await?;
//! let registry = Arc::new(connection.registry().await?);
//! let llm = Arc::new(OpenAIClient::new(api_key, api_base, model));
//! let coordinator = ToolCoordinator::with_defaults(llm, registry);
//! let result = coordinator.execute(None, "What is 17% of 2.4 million?").await?;
//! ```
//!
//! ## Modules
//!
//! - [`compute`] - Wolfram|Alpha query tool with retry and answer extraction
//! - [`search`] - Web search providers and the answering agent
//! - [`mcp`] - MCP server and HTTP transport
//! - [`llm`] - OpenAI-compatible client and the tool-calling loop
//! - [`tools`] - Tool registry and MCP-backed remote tools
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line parsing and terminal output.
pub mod cli;
/// Computational queries (Wolfram|Alpha).
pub mod compute;
/// LLM clients and the tool-calling coordinator.
pub mod llm;
/// Model Context Protocol (MCP) server.
pub mod mcp;
/// Web search providers and agent.
pub mod search;
/// Tool registry and remote MCP tools.
pub mod tools;
/// Core types (messages, errors).
pub mod types;
/// Configuration, logging, retry and worker pool utilities.
pub mod utils;

// Re-export commonly used types
pub use compute::{ComputeTool, WolframAlphaClient, NO_RESULT};
pub use llm::{LLMClient, LLMResponse, OpenAIClient, ToolCoordinator};
pub use mcp::OdsMcpServer;
pub use search::{DeepSearchAgent, SearchAgent, SearchRequest};
pub use tools::{McpConnection, RemoteTool, ToolRegistry};
pub use types::{AppError, Result};
pub use utils::config::ServerConfig;
