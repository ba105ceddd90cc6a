//! Computational Query Tool
//!
//! [`ComputeTool`] sends a free-form query to a computational-knowledge
//! provider (Wolfram|Alpha in production), retries transient failures, and
//! reduces the provider's pod/subpod response to a single plain-text answer.
//!
//! # Answer selection
//!
//! 1. Every pod with a non-empty title contributes its first non-empty
//!    subpod text, in response order.
//! 2. The first contribution from a pod titled exactly `"Result"` wins.
//! 3. Otherwise the first contribution wins.
//! 4. Otherwise the answer is [`NO_RESULT`].
//!
//! A provider that keeps failing is an error, never [`NO_RESULT`]: the
//! sentinel only means the provider answered without usable text.

/// Wolfram|Alpha v2 query API client.
pub mod wolfram;

use crate::types::Result;
use crate::utils::pool::WorkerPool;
use crate::utils::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use wolfram::WolframAlphaClient;

/// Answer returned when the provider reply holds no usable text.
pub const NO_RESULT: &str = "Không tìm thấy kết quả.";

/// Title of the pod preferred as the answer.
pub const RESULT_POD_TITLE: &str = "Result";

// ============= Provider Types =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub pods: Vec<Pod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subpods: Vec<Subpod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subpod {
    #[serde(default)]
    pub plaintext: Option<String>,
}

impl Pod {
    pub fn new(title: impl Into<String>, texts: &[&str]) -> Self {
        Self {
            title: title.into(),
            subpods: texts
                .iter()
                .map(|t| Subpod {
                    plaintext: Some(t.to_string()),
                })
                .collect(),
        }
    }
}

/// A computational-knowledge backend.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    async fn query(&self, input: &str) -> Result<ProviderResponse>;
}

// ============= Extraction =============

/// One pod's contribution: its title and first non-empty subpod text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub title: String,
    pub text: String,
}

/// Whitespace-only text counts as missing, so a blank `Result` pod falls
/// through to the next pod with real text.
fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Flatten a provider response, keeping the first non-empty subpod per pod.
pub fn extract_results(response: &ProviderResponse) -> Vec<ExtractedEntry> {
    response
        .pods
        .iter()
        .filter(|pod| has_text(&pod.title))
        .filter_map(|pod| {
            pod.subpods
                .iter()
                .filter_map(|subpod| subpod.plaintext.as_deref())
                .find(|text| has_text(text))
                .map(|text| ExtractedEntry {
                    title: pod.title.clone(),
                    text: text.to_string(),
                })
        })
        .collect()
}

/// Pick the final answer from extracted entries.
pub fn select_answer(entries: &[ExtractedEntry]) -> String {
    entries
        .iter()
        .find(|entry| entry.title == RESULT_POD_TITLE)
        .or_else(|| entries.first())
        .map(|entry| entry.text.clone())
        .unwrap_or_else(|| NO_RESULT.to_string())
}

// ============= Tool =============

/// Retrying, pool-dispatched wrapper around a [`ComputeProvider`].
#[derive(Clone)]
pub struct ComputeTool {
    provider: Arc<dyn ComputeProvider>,
    pool: WorkerPool,
    retry_policy: RetryPolicy,
}

impl ComputeTool {
    /// Single-worker pool, 3 attempts, 2 s between attempts.
    pub fn new(provider: Arc<dyn ComputeProvider>) -> Self {
        Self {
            provider,
            pool: WorkerPool::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Answer `query`, or return the provider's last error once every
    /// attempt has failed.
    pub async fn compute(&self, query: &str) -> Result<String> {
        let response = retry(
            &self.retry_policy,
            |_| true,
            |attempt| {
                let provider = Arc::clone(&self.provider);
                let pool = self.pool.clone();
                let input = query.to_string();
                async move {
                    pool.run(async move { provider.query(&input).await })
                        .await
                        .inspect_err(|e| {
                            tracing::error!(attempt, error = %e, "compute provider query failed")
                        })
                }
            },
        )
        .await?;

        let entries = extract_results(&response);
        let answer = select_answer(&entries);
        tracing::info!(query, pods = entries.len(), "computation succeeded");
        Ok(answer)
    }
}
