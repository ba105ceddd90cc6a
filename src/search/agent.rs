use super::{SearchAgent, SearchHit, SearchProvider, SearchRequest, SearchResults};
use super::providers::{SearxngProvider, SerperProvider};
use crate::llm::{LLMClient, OpenAIClient};
use crate::types::{AppError, Result};
use crate::utils::config::{SearchBackend, ServerConfig};
use async_trait::async_trait;
use futures::future::join_all;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;

const PAGE_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_EXCERPT_CHARS: usize = 2000;

const ANSWER_SYSTEM_PROMPT: &str = "You answer questions using only the numbered web sources \
provided. Cite the sources you rely on as [n]. If the sources do not contain the answer, say so \
plainly instead of guessing.";

/// Search provider plus optional model synthesis.
pub struct DeepSearchAgent {
    provider: Arc<dyn SearchProvider>,
    llm: Option<Arc<dyn LLMClient>>,
    http: reqwest::Client,
}

impl DeepSearchAgent {
    pub fn new(provider: Arc<dyn SearchProvider>, llm: Option<Arc<dyn LLMClient>>) -> Self {
        Self {
            provider,
            llm,
            http: reqwest::Client::new(),
        }
    }

    /// Build the agent described by the server configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ods-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let provider: Arc<dyn SearchProvider> = match &config.search {
            SearchBackend::Serper { api_key } => {
                Arc::new(SerperProvider::new(http.clone(), api_key.clone()))
            }
            SearchBackend::Searxng {
                instance_url,
                api_key,
            } => Arc::new(SearxngProvider::new(
                http.clone(),
                instance_url.clone(),
                api_key.clone(),
            )),
        };

        let llm = config
            .llm
            .as_ref()
            .map(|llm| Arc::new(OpenAIClient::from_config(llm)) as Arc<dyn LLMClient>);

        Ok(Self { provider, llm, http })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    async fn fetch_excerpt(&self, hit: &SearchHit) -> Option<String> {
        let page = async {
            let resp = self
                .http
                .get(&hit.url)
                .timeout(PAGE_TIMEOUT)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            let status = resp.status();
            if !status.is_success() {
                return Err(format!("HTTP {status}"));
            }
            let body = resp.text().await.map_err(|e| e.to_string())?;
            Ok::<String, String>(body)
        };

        match page.await {
            Ok(html) => Some(extract_page_text(&html, MAX_EXCERPT_CHARS)).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(url = %hit.url, error = %e, "skipping source page");
                None
            }
        }
    }
}

/// Paragraph text of an HTML page, whitespace-collapsed and cut at
/// `max_chars` characters.
pub fn extract_page_text(html: &str, max_chars: usize) -> String {
    let Ok(paragraphs) = Selector::parse("p") else {
        return String::new();
    };
    let document = Html::parse_document(html);

    let text = document
        .select(&paragraphs)
        .map(|p| p.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    text.chars().take(max_chars).collect()
}

/// Numbered source context handed to the model.
pub fn build_context(results: &SearchResults, excerpts: &[Option<String>]) -> String {
    let mut blocks = Vec::new();

    if let Some(answer) = &results.answer {
        blocks.push(format!("Answer: {}", answer));
    }

    for (i, hit) in results.hits.iter().enumerate() {
        let mut block = format!("[{}] {}\n{}", i + 1, hit.title, hit.url);
        if !hit.snippet.is_empty() {
            block.push('\n');
            block.push_str(&hit.snippet);
        }
        if let Some(Some(excerpt)) = excerpts.get(i) {
            block.push_str("\nExcerpt: ");
            block.push_str(excerpt);
        }
        blocks.push(block);
    }

    blocks.join("\n\n")
}

#[async_trait]
impl SearchAgent for DeepSearchAgent {
    async fn ask(&self, request: &SearchRequest) -> Result<String> {
        let max_sources = request.max_sources.max(1);
        let mut results = self.provider.search(&request.query, max_sources).await?;
        results.hits.truncate(max_sources);

        if results.hits.is_empty() && results.answer.is_none() {
            tracing::info!(query = %request.query, "search returned no results");
            return Ok(format!("No search results found for: {}", request.query));
        }

        let excerpts = if request.pro_mode {
            join_all(results.hits.iter().map(|hit| self.fetch_excerpt(hit))).await
        } else {
            Vec::new()
        };

        let context = build_context(&results, &excerpts);
        tracing::info!(
            query = %request.query,
            provider = self.provider.name(),
            sources = results.hits.len(),
            pro_mode = request.pro_mode,
            "search succeeded"
        );

        match &self.llm {
            Some(llm) => {
                let prompt = format!("Sources:\n\n{}\n\nQuestion: {}", context, request.query);
                llm.generate_with_system(ANSWER_SYSTEM_PROMPT, &prompt).await
            }
            None => Ok(context),
        }
    }
}
