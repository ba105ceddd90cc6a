//! Tools served by a remote MCP server
//!
//! [`McpConnection`] opens a streamable-HTTP MCP session and turns every tool
//! the server lists into a [`RemoteTool`], which the local [`ToolRegistry`]
//! treats like any other tool.
//!
//! [`ToolRegistry`]: crate::tools::registry::ToolRegistry

use crate::tools::registry::{Tool, ToolRegistry};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, Tool as McpTool},
    service::{Peer, RunningService},
    transport::StreamableHttpClientTransport,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use std::sync::Arc;

/// An open MCP client session.
pub struct McpConnection {
    service: RunningService<RoleClient, ()>,
}

impl McpConnection {
    /// Connect to a streamable-HTTP MCP endpoint such as `http://127.0.0.1:7860/mcp`.
    pub async fn connect(url: &str) -> Result<Self> {
        let transport = StreamableHttpClientTransport::from_uri(url.to_string());
        let service = ()
            .serve(transport)
            .await
            .map_err(|e| AppError::Tool(format!("MCP connection to {} failed: {}", url, e)))?;

        tracing::info!(url, "connected to MCP server");
        Ok(Self { service })
    }

    /// Proxies for every tool the server lists.
    pub async fn remote_tools(&self) -> Result<Vec<RemoteTool>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| AppError::Tool(format!("Listing MCP tools failed: {}", e)))?;

        Ok(tools
            .into_iter()
            .map(|tool| RemoteTool::new(self.service.peer().clone(), tool))
            .collect())
    }

    /// Registry holding every remote tool.
    pub async fn registry(&self) -> Result<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        for tool in self.remote_tools().await? {
            registry.register(Arc::new(tool));
        }
        Ok(registry)
    }

    pub async fn close(self) -> Result<()> {
        self.service
            .cancel()
            .await
            .map_err(|e| AppError::Internal(format!("MCP session shutdown failed: {}", e)))?;
        Ok(())
    }
}

/// A tool executed by a remote MCP server.
pub struct RemoteTool {
    peer: Peer<RoleClient>,
    name: String,
    description: String,
    schema: Value,
}

impl RemoteTool {
    pub fn new(peer: Peer<RoleClient>, tool: McpTool) -> Self {
        Self {
            peer,
            name: tool.name.to_string(),
            description: tool
                .description
                .map(|d| d.to_string())
                .unwrap_or_default(),
            schema: Value::Object(tool.input_schema.as_ref().clone()),
        }
    }
}

/// Concatenate the text parts of a tool result.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let arguments = match args {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Tool arguments must be an object, got {}",
                    other
                )))
            }
        };

        let result = self
            .peer
            .call_tool(CallToolRequestParam {
                name: self.name.clone().into(),
                arguments,
            })
            .await
            .map_err(|e| AppError::Tool(format!("{} call failed: {}", self.name, e)))?;

        let text = result_text(&result);
        if result.is_error.unwrap_or(false) {
            return Err(AppError::Tool(text));
        }
        Ok(Value::String(text))
    }
}
