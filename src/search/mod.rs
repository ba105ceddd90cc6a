//! Web Search
//!
//! A [`SearchAgent`] answers a question from web search results. The
//! production agent, [`DeepSearchAgent`], queries a [`SearchProvider`]
//! (Serper or SearXNG), assembles a numbered source context and, when a model
//! is configured, asks it to answer from that context.
//!
//! Ranking is left to the provider: results are used in the order returned.

/// Context building and model synthesis.
pub mod agent;
/// Serper and SearXNG API clients.
pub mod providers;

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use agent::DeepSearchAgent;
pub use providers::{SearxngProvider, SerperProvider};

/// Default number of sources used to build the context.
pub const DEFAULT_MAX_SOURCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_sources: usize,
    /// Fetch each source page and add its text to the context.
    pub pro_mode: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_sources: DEFAULT_MAX_SOURCES,
            pro_mode: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Direct answer offered by the provider (Serper's answer box).
    pub answer: Option<String>,
    pub hits: Vec<SearchHit>,
}

/// A web search API.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults>;
}

/// Answers a question from the web.
#[async_trait]
pub trait SearchAgent: Send + Sync {
    async fn ask(&self, request: &SearchRequest) -> Result<String>;
}
