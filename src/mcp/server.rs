use crate::compute::{ComputeTool, WolframAlphaClient};
use crate::search::{DeepSearchAgent, SearchAgent, SearchRequest, DEFAULT_MAX_SOURCES};
use crate::types::AppError;
use crate::utils::config::ServerConfig;
use crate::utils::pool::WorkerPool;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    },
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path the MCP endpoint is mounted at.
pub const MCP_PATH: &str = "/mcp";

/// Parameters for web search
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchParams {
    /// The question or search query
    pub query: String,
    /// Number of sources used to build the answer (default 2)
    pub max_sources: Option<usize>,
    /// Read each source page for a deeper answer (slower)
    pub pro_mode: Option<bool>,
}

/// Parameters for computation
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CalculateParams {
    /// A math expression, unit conversion, or factual computational question
    pub query: String,
}

/// MCP server exposing web search and Wolfram|Alpha computation.
#[derive(Clone)]
pub struct OdsMcpServer {
    tool_router: ToolRouter<Self>,
    search: Arc<dyn SearchAgent>,
    compute: Option<Arc<ComputeTool>>,
}

#[tool_router]
impl OdsMcpServer {
    /// `compute` is `None` when no Wolfram|Alpha app id is configured.
    pub fn new(search: Arc<dyn SearchAgent>, compute: Option<Arc<ComputeTool>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            search,
            compute,
        }
    }

    /// Build every collaborator the configuration describes.
    pub fn from_config(config: &ServerConfig) -> crate::types::Result<Self> {
        let search = DeepSearchAgent::from_config(config)?;
        tracing::info!(
            provider = search.provider_name(),
            model = config.llm.as_ref().map(|l| l.model.as_str()).unwrap_or("none"),
            "search agent initialized"
        );

        let compute = match &config.compute.app_id {
            Some(app_id) => {
                let client = WolframAlphaClient::new(app_id.clone())?;
                let tool = ComputeTool::new(Arc::new(client))
                    .with_pool(WorkerPool::new(config.compute.workers));
                Some(Arc::new(tool))
            }
            None => {
                tracing::warn!("WOLFRAM_APP_ID is not set, the calculate tool will report itself unavailable");
                None
            }
        };

        Ok(Self::new(Arc::new(search), compute))
    }

    /// Performs a web search and builds an answer from the results
    #[tool(description = "Performs a web search and builds a context from the search results")]
    async fn search_tool(
        &self,
        params: Parameters<SearchParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let params = params.0;
        let request = SearchRequest {
            query: params.query,
            max_sources: params.max_sources.unwrap_or(DEFAULT_MAX_SOURCES),
            pro_mode: params.pro_mode.unwrap_or(false),
        };

        match self.search.ask(&request).await {
            Ok(answer) => Ok(CallToolResult::success(vec![Content::text(answer)])),
            Err(e) => {
                tracing::error!(query = %request.query, error = %e, "search failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Search failed: {}",
                    e
                ))]))
            }
        }
    }

    /// Computational, mathematical and real-world queries via Wolfram|Alpha
    #[tool(
        description = "Perform computational, mathematical, and real-world queries using Wolfram Alpha"
    )]
    async fn calculate(
        &self,
        params: Parameters<CalculateParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let query = params.0.query;

        let Some(compute) = &self.compute else {
            return Ok(CallToolResult::error(vec![Content::text(
                "calculate is unavailable: no Wolfram|Alpha app id is configured (WOLFRAM_APP_ID)",
            )]));
        };

        match compute.compute(&query).await {
            Ok(answer) => Ok(CallToolResult::success(vec![Content::text(answer)])),
            Err(e) => {
                tracing::error!(query = %query, error = %e, "calculation failed after retries");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Calculation failed: {}",
                    e
                ))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for OdsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ods-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "ODS MCP Server - web search (search_tool) and Wolfram|Alpha computation (calculate)"
                    .into(),
            ),
        }
    }
}

impl OdsMcpServer {
    /// Axum router serving the streamable-HTTP MCP endpoint at [`MCP_PATH`].
    pub fn router(&self) -> axum::Router {
        let server = self.clone();
        let service: StreamableHttpService<Self, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(server.clone()),
            Default::default(),
            StreamableHttpServerConfig::default(),
        );

        axum::Router::new()
            .nest_service(MCP_PATH, service)
            .layer(TraceLayer::new_for_http())
    }
}

/// Serve `server` on `addr` until Ctrl-C.
pub async fn serve_http(server: OdsMcpServer, addr: SocketAddr) -> crate::types::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("MCP server listening on http://{}{}", addr, MCP_PATH);

    axum::serve(listener, server.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoSearch;

    #[async_trait]
    impl SearchAgent for EchoSearch {
        async fn ask(&self, request: &SearchRequest) -> crate::types::Result<String> {
            Ok(request.query.clone())
        }
    }

    #[test]
    fn test_server_info() {
        let server = OdsMcpServer::new(Arc::new(EchoSearch), None);
        let info = server.get_info();
        assert_eq!(info.server_info.name, "ods-server");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_routes_both_tools() {
        let server = OdsMcpServer::new(Arc::new(EchoSearch), None);
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["calculate", "search_tool"]);
    }
}
