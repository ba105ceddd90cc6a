//! Tool infrastructure for the agent loop
//!
//! - [`registry`](crate::tools::registry) - The [`Tool`] trait and [`ToolRegistry`]
//! - [`remote`](crate::tools::remote) - Tools proxied from an MCP server
//!
//! ```ignore
//! let connection = McpConnection::connect("http://127.0.0.1:7860/mcp").await?;
//! let registry = connection.registry().await?;
//! let answer = registry.execute("calculate", json!({"query": "2+2"})).await?;
//! ```

/// Tool registry for managing available tools.
pub mod registry;
/// MCP client session and remote tool proxies.
pub mod remote;

pub use registry::{Tool, ToolRegistry};
pub use remote::{McpConnection, RemoteTool};
