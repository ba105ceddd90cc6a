//! Model Context Protocol server exposing `search_tool` and `calculate`
//! over streamable HTTP.

pub mod server;

pub use server::{serve_http, CalculateParams, OdsMcpServer, SearchParams, MCP_PATH};
