use std::net::{SocketAddr, ToSocketAddrs};

use crate::types::{AppError, Result};

/// Default OpenAI-compatible endpoint used for model calls.
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model for search answers and the demo agent.
pub const DEFAULT_MODEL: &str = "openrouter/google/gemini-2.0-flash-001";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub search: SearchBackend,
    /// Model used to answer from search context. `None` returns the raw context.
    pub llm: Option<LlmConfig>,
    pub compute: ComputeConfig,
}

impl ServerConfig {
    /// Resolve `host` (an IP literal or a host name) and `port` to the
    /// first matching socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                AppError::Config(format!("invalid bind address {}: {}", self.host, e))
            })?
            .next()
            .ok_or_else(|| {
                AppError::Config(format!("bind address {} resolved to nothing", self.host))
            })
    }
}

/// Where web search requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBackend {
    Serper { api_key: String },
    Searxng {
        instance_url: String,
        api_key: Option<String>,
    },
}

impl SearchBackend {
    pub fn serper(api_key: Option<String>) -> Result<Self> {
        match non_empty(api_key) {
            Some(api_key) => Ok(SearchBackend::Serper { api_key }),
            None => Err(AppError::Config(
                "a Serper API key is required when using the serper search provider \
                 (--serper-api-key or SERPER_API_KEY)"
                    .to_string(),
            )),
        }
    }

    pub fn searxng(instance_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        match non_empty(instance_url) {
            Some(instance_url) => Ok(SearchBackend::Searxng {
                instance_url,
                api_key: non_empty(api_key),
            }),
            None => Err(AppError::Config(
                "a SearXNG instance URL is required when using the searxng search provider \
                 (--searxng-instance)"
                    .to_string(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::Serper { .. } => "serper",
            SearchBackend::Searxng { .. } => "searxng",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub model: String,
    pub api_base: String,
    pub api_key: String,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    /// Wolfram|Alpha application id. Without it the `calculate` tool reports
    /// itself as unavailable.
    pub app_id: Option<String>,
    pub workers: usize,
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
