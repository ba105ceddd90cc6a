use super::{SearchHit, SearchProvider, SearchResults};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

// ============= Serper =============

pub struct SerperProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SerperProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: SERPER_SEARCH_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
    #[serde(rename = "answerBox")]
    answer_box: Option<SerperAnswerBox>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerperAnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": limit }))
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Search(format!("serper search HTTP {status}")));
        }

        let parsed: SerperResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let hits = parsed
            .organic
            .into_iter()
            .filter_map(|r| {
                let url = r.link?;
                Some(SearchHit {
                    title: r.title.unwrap_or_default(),
                    url,
                    snippet: r.snippet.unwrap_or_default(),
                })
            })
            .take(limit)
            .collect();

        let answer = parsed
            .answer_box
            .and_then(|b| b.answer.or(b.snippet))
            .filter(|a| !a.trim().is_empty());

        Ok(SearchResults { answer, hits })
    }
}

// ============= SearXNG =============

pub struct SearxngProvider {
    client: reqwest::Client,
    instance_url: String,
    api_key: Option<String>,
}

impl SearxngProvider {
    pub fn new(client: reqwest::Client, instance_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            instance_url: instance_url.into(),
            api_key,
        }
    }

    fn endpoint_search(&self) -> String {
        // Accept either a base URL (…/), or a full /search endpoint.
        let mut base = self.instance_url.trim().trim_end_matches('/').to_string();
        if !base.ends_with("/search") {
            base.push_str("/search");
        }
        base
    }
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    results: Option<Vec<SearxngResult>>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    url: Option<String>,
    title: Option<String>,
    // SearXNG uses `content` for snippets in JSON format.
    content: Option<String>,
}

#[async_trait]
impl SearchProvider for SearxngProvider {
    fn name(&self) -> &'static str {
        "searxng"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let mut req = self
            .client
            .get(self.endpoint_search())
            .query(&[("q", query), ("format", "json")]);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let resp = req
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Search(format!("searxng search HTTP {status}")));
        }

        let parsed: SearxngResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let hits = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| {
                let url = r.url?;
                Some(SearchHit {
                    title: r.title.unwrap_or_default(),
                    url,
                    snippet: r.content.unwrap_or_default(),
                })
            })
            .take(limit)
            .collect();

        Ok(SearchResults { answer: None, hits })
    }
}
