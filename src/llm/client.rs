//! LLM client abstraction
//!
//! Everything that talks to a language model goes through [`LLMClient`], so
//! the search agent and the tool coordinator can be exercised with scripted
//! clients in tests.

use crate::types::{ConversationMessage, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate from a full conversation, offering `tools` to the model.
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

/// Strip a LiteLLM-style routing prefix (`openrouter/google/gemini...`) so
/// the id can be sent to an OpenAI-compatible endpoint as-is.
pub fn api_model_id(model: &str) -> &str {
    model.strip_prefix("openrouter/").unwrap_or(model)
}
