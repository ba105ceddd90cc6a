//! CLI module for ODS
//!
//! Argument parsing for the `ods-server` and `ods-demo` binaries. Every flag
//! can also come from the environment (or a `.env` file).

pub mod output;

use crate::types::Result;
use crate::utils::config::{
    non_empty, ComputeConfig, LlmConfig, SearchBackend, ServerConfig, DEFAULT_API_BASE,
    DEFAULT_MODEL,
};
use clap::{Parser, ValueEnum};

/// Web search backend selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchProviderKind {
    Serper,
    Searxng,
}

/// ODS - Open Deep Search tool server
///
/// Serves `search_tool` and `calculate` over MCP streamable HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "ods-server",
    version,
    about = "ODS - web search and Wolfram|Alpha tools over MCP",
    after_help = "EXAMPLES:\n    \
                  ods-server --serper-api-key $KEY                     # Serper search\n    \
                  ods-server --search-provider searxng \\\n        \
                  --searxng-instance http://localhost:8080            # Self-hosted SearXNG\n    \
                  ods-server --server-port 9000 --verbose"
)]
pub struct ServerCli {
    /// Model used to answer from search results
    #[arg(long, env = "LITELLM_SEARCH_MODEL_ID", default_value = DEFAULT_MODEL)]
    pub model_name: String,

    /// Web search backend
    #[arg(long, value_enum, default_value_t = SearchProviderKind::Serper)]
    pub search_provider: SearchProviderKind,

    /// SearXNG instance URL (required with --search-provider searxng)
    #[arg(long, env = "SEARXNG_INSTANCE_URL")]
    pub searxng_instance: Option<String>,

    /// SearXNG API key, if the instance requires one
    #[arg(long, env = "SEARXNG_API_KEY", hide_env_values = true)]
    pub searxng_api_key: Option<String>,

    /// Serper API key (required with --search-provider serper)
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub openai_base_url: String,

    /// API key for the answer model; without it search returns the raw source context
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Wolfram|Alpha application id
    #[arg(long, env = "WOLFRAM_APP_ID", hide_env_values = true)]
    pub wolfram_app_id: Option<String>,

    /// Concurrent Wolfram|Alpha calls
    #[arg(long, default_value_t = 1)]
    pub compute_workers: usize,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "SERVER_PORT", default_value_t = 7860)]
    pub server_port: u16,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerCli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the arguments into a [`ServerConfig`].
    pub fn into_config(self) -> Result<ServerConfig> {
        let search = match self.search_provider {
            SearchProviderKind::Serper => SearchBackend::serper(self.serper_api_key)?,
            SearchProviderKind::Searxng => {
                SearchBackend::searxng(self.searxng_instance, self.searxng_api_key)?
            }
        };

        let llm = non_empty(self.llm_api_key).map(|api_key| LlmConfig {
            model: self.model_name,
            api_base: self.openai_base_url,
            api_key,
            temperature: None,
        });

        Ok(ServerConfig {
            host: self.host,
            port: self.server_port,
            search,
            llm,
            compute: ComputeConfig {
                app_id: non_empty(self.wolfram_app_id),
                workers: self.compute_workers.max(1),
            },
        })
    }
}

/// ODS demo agent
///
/// Interactive terminal agent that answers questions with the tools of a
/// running `ods-server`.
#[derive(Parser, Debug)]
#[command(name = "ods-demo", version, about = "ODS - interactive tool-calling agent")]
pub struct DemoCli {
    /// MCP endpoint of the tool server
    #[arg(long, default_value = "http://127.0.0.1:7860/mcp")]
    pub server_url: String,

    /// Model driving the agent
    #[arg(long, env = "LITELLM_MODEL_ID", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.2)]
    pub temperature: f32,

    /// API key for the model endpoint
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub base_url: String,

    /// Maximum model/tool round trips per question
    #[arg(long, default_value_t = 10)]
    pub max_iterations: usize,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl DemoCli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.model.clone(),
            api_base: self.base_url.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            temperature: Some(self.temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        ServerCli::command().debug_assert();
        DemoCli::command().debug_assert();
    }

    #[test]
    fn test_server_defaults() {
        let cli = ServerCli::try_parse_from(["ods-server", "--serper-api-key", "k"]).unwrap();
        assert_eq!(cli.search_provider, SearchProviderKind::Serper);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.compute_workers, 1);

        let config = cli.into_config().unwrap();
        assert_eq!(
            config.search,
            SearchBackend::Serper {
                api_key: "k".to_string()
            }
        );
    }

    #[test]
    fn test_host_name_is_accepted() {
        let cli = ServerCli::try_parse_from([
            "ods-server",
            "--serper-api-key",
            "k",
            "--host",
            "localhost",
            "--server-port",
            "9000",
        ])
        .unwrap();
        let addr = cli.into_config().unwrap().bind_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_searxng_without_instance_is_rejected() {
        let cli = ServerCli::try_parse_from([
            "ods-server",
            "--search-provider",
            "searxng",
            "--searxng-instance",
            "",
        ])
        .unwrap();
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_unknown_provider_is_a_parse_error() {
        let result = ServerCli::try_parse_from(["ods-server", "--search-provider", "bing"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_llm_is_optional() {
        let cli = ServerCli::try_parse_from([
            "ods-server",
            "--serper-api-key",
            "k",
            "--llm-api-key",
            "  ",
            "--compute-workers",
            "0",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert!(config.llm.is_none());
        assert_eq!(config.compute.workers, 1);
    }

    #[test]
    fn test_demo_llm_config() {
        let cli = DemoCli::try_parse_from([
            "ods-demo",
            "--model",
            "gpt-4o-mini",
            "--api-key",
            "sk",
            "--temperature",
            "0.5",
        ])
        .unwrap();
        let llm = cli.llm_config();
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.api_key, "sk");
        assert_eq!(llm.temperature, Some(0.5));
        assert_eq!(cli.max_iterations, 10);
    }
}
