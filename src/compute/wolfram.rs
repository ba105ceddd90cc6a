use super::{ComputeProvider, Pod, ProviderResponse};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const WOLFRAM_QUERY_URL: &str = "https://api.wolframalpha.com/v2/query";

/// Wolfram|Alpha Full Results API client (JSON output, plaintext format).
pub struct WolframAlphaClient {
    http: reqwest::Client,
    app_id: String,
    endpoint: String,
}

impl WolframAlphaClient {
    pub fn new(app_id: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            app_id: app_id.into(),
            endpoint: WOLFRAM_QUERY_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (mock servers, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    queryresult: QueryResult,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    success: bool,
    /// `false` on success, an object with `code`/`msg` on failure.
    #[serde(default)]
    error: serde_json::Value,
    #[serde(default)]
    pods: Vec<Pod>,
}

fn parse_query_result(body: &str) -> Result<ProviderResponse> {
    let envelope: QueryEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::Provider(format!("Malformed Wolfram|Alpha response: {}", e)))?;
    let result = envelope.queryresult;

    if let Some(error) = result.error.as_object() {
        let message = error
            .get("msg")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Err(AppError::Provider(format!("Wolfram|Alpha error: {}", message)));
    }

    if !result.success {
        return Ok(ProviderResponse::default());
    }

    Ok(ProviderResponse { pods: result.pods })
}

#[async_trait]
impl ComputeProvider for WolframAlphaClient {
    async fn query(&self, input: &str) -> Result<ProviderResponse> {
        tracing::debug!(input, "Wolfram|Alpha query");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("input", input),
                ("output", "json"),
                ("format", "plaintext"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Wolfram|Alpha request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Provider(format!("Wolfram|Alpha read failed: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Provider(format!(
                "Wolfram|Alpha HTTP {}: {}",
                status, body
            )));
        }

        parse_query_result(&body)
    }
}
