//! Multi-turn tool calling
//!
//! [`ToolCoordinator`] drives the function-calling loop between a model and
//! a [`ToolRegistry`]:
//!
//! 1. Send the conversation with the available tools to the model
//! 2. If the model requests tool calls, execute them
//! 3. Append the tool results to the conversation
//! 4. Repeat until the model answers without tool calls or the iteration
//!    budget runs out
//!
//! ```rust,ignore
//! let coordinator = ToolCoordinator::new(client, registry, ToolCallingConfig::default());
//! let result = coordinator.execute(Some("You are a helpful assistant."), "What's 2 + 2?").await?;
//! println!("{}", result.content);
//! ```

use crate::llm::client::LLMClient;
use crate::tools::registry::ToolRegistry;
use crate::types::{AppError, ConversationMessage, MessageRole, Result, ToolCall};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Configuration for tool calling coordination behavior.
#[derive(Debug, Clone)]
pub struct ToolCallingConfig {
    /// Maximum number of LLM round-trips before stopping.
    pub max_iterations: usize,

    /// Whether to execute multiple tool calls of one turn in parallel.
    pub parallel_execution: bool,

    /// Timeout for individual tool execution.
    pub tool_timeout: Duration,

    /// Whether to stop on the first tool error, or report it to the model.
    pub stop_on_error: bool,
}

impl Default for ToolCallingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            parallel_execution: true,
            // Search in pro mode plus compute retries can take a while.
            tool_timeout: Duration::from_secs(120),
            stop_on_error: false,
        }
    }
}

/// Record of a single tool call execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Identifier of the call (from the LLM).
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    /// Result returned by the tool (or error object).
    pub result: serde_json::Value,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Reason why a tool coordination session ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FinishReason {
    /// Model decided to stop (no more tool calls).
    Stop,
    /// Hit the maximum iterations limit.
    MaxIterations,
    /// Model tried to call an unknown tool.
    UnknownTool(String),
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::MaxIterations => write!(f, "max_iterations"),
            FinishReason::UnknownTool(t) => write!(f, "unknown_tool: {}", t),
        }
    }
}

/// Result of a complete tool coordination session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorResult {
    /// Final text response from the model.
    pub content: String,
    /// All tool calls made during the session.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of LLM round-trips performed.
    pub iterations: usize,
    pub finish_reason: FinishReason,
    /// Full message history, including tool results.
    pub message_history: Vec<ConversationMessage>,
}

pub struct ToolCoordinator {
    client: Arc<dyn LLMClient>,
    registry: Arc<ToolRegistry>,
    config: ToolCallingConfig,
}

impl ToolCoordinator {
    pub fn new(
        client: Arc<dyn LLMClient>,
        registry: Arc<ToolRegistry>,
        config: ToolCallingConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    pub fn with_defaults(client: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        Self::new(client, registry, ToolCallingConfig::default())
    }

    /// Run a fresh conversation for `prompt`.
    pub async fn execute(&self, system: Option<&str>, prompt: &str) -> Result<CoordinatorResult> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(ConversationMessage::system(sys));
        }
        messages.push(ConversationMessage::user(prompt));
        self.execute_with_history(messages).await
    }

    /// Continue an existing conversation. The last message is normally the
    /// new user turn.
    pub async fn execute_with_history(
        &self,
        mut messages: Vec<ConversationMessage>,
    ) -> Result<CoordinatorResult> {
        let tools = self.registry.get_tool_definitions();
        let mut all_tool_calls: Vec<ToolCallRecord> = Vec::new();

        for iteration in 0..self.config.max_iterations {
            let response = self
                .client
                .generate_with_tools_and_history(&messages, &tools)
                .await?;

            messages.push(ConversationMessage::assistant(
                &response.content,
                response.tool_calls.clone(),
            ));

            if response.tool_calls.is_empty() {
                return Ok(CoordinatorResult {
                    content: response.content,
                    tool_calls: all_tool_calls,
                    iterations: iteration + 1,
                    finish_reason: FinishReason::Stop,
                    message_history: messages,
                });
            }

            if let Some(unknown) = response
                .tool_calls
                .iter()
                .find(|call| !self.registry.has_tool(&call.name))
            {
                tracing::warn!(tool = %unknown.name, "model requested an unknown tool");
                return Ok(CoordinatorResult {
                    content: response.content,
                    tool_calls: all_tool_calls,
                    iterations: iteration + 1,
                    finish_reason: FinishReason::UnknownTool(unknown.name.clone()),
                    message_history: messages,
                });
            }

            let records = self.execute_tool_calls(&response.tool_calls).await;
            for record in records {
                if !record.success && self.config.stop_on_error {
                    return Err(AppError::Tool(format!(
                        "{} failed: {}",
                        record.name,
                        record.error.unwrap_or_default()
                    )));
                }
                messages.push(ConversationMessage::tool_result(&record.id, &record.result));
                all_tool_calls.push(record);
            }
        }

        Ok(CoordinatorResult {
            content: messages
                .iter()
                .rev()
                .find(|m| matches!(m.role, MessageRole::Assistant))
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            tool_calls: all_tool_calls,
            iterations: self.config.max_iterations,
            finish_reason: FinishReason::MaxIterations,
            message_history: messages,
        })
    }

    async fn execute_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolCallRecord> {
        if self.config.parallel_execution {
            join_all(calls.iter().map(|call| self.execute_single_tool(call))).await
        } else {
            let mut records = Vec::with_capacity(calls.len());
            for call in calls {
                records.push(self.execute_single_tool(call).await);
            }
            records
        }
    }

    async fn execute_single_tool(&self, call: &ToolCall) -> ToolCallRecord {
        let start = Instant::now();
        tracing::info!(tool = %call.name, id = %call.id, "executing tool call");

        let result = timeout(
            self.config.tool_timeout,
            self.registry.execute(&call.name, call.arguments.clone()),
        )
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        let (result, error) = match result {
            Ok(Ok(value)) => (value, None),
            Ok(Err(e)) => (serde_json::json!({"error": e.to_string()}), Some(e.to_string())),
            Err(_) => (
                serde_json::json!({"error": "Tool execution timed out"}),
                Some("Tool execution timed out".to_string()),
            ),
        };

        if let Some(e) = &error {
            tracing::warn!(tool = %call.name, error = %e, duration_ms, "tool call failed");
        }

        ToolCallRecord {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
            success: error.is_none(),
            duration_ms,
            error,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ToolCallingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_calling_config_default() {
        let config = ToolCallingConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert!(config.parallel_execution);
        assert_eq!(config.tool_timeout, Duration::from_secs(120));
        assert!(!config.stop_on_error);
    }

    #[test]
    fn test_finish_reason_display() {
        assert_eq!(FinishReason::Stop.to_string(), "stop");
        assert_eq!(FinishReason::MaxIterations.to_string(), "max_iterations");
        assert_eq!(
            FinishReason::UnknownTool("unknown".to_string()).to_string(),
            "unknown_tool: unknown"
        );
    }

    #[test]
    fn test_tool_call_record_serialization() {
        let record = ToolCallRecord {
            id: "call_1".to_string(),
            name: "calculate".to_string(),
            arguments: serde_json::json!({"query": "2+2"}),
            result: serde_json::json!("4"),
            success: true,
            duration_ms: 100,
            error: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("calculate"));
        assert!(json.contains("\"success\":true"));
    }
}
