//! Mock implementations for testing.
//!
//! Scripted model, compute provider and search agent doubles shared by the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ods::compute::{ComputeProvider, Pod, ProviderResponse};
use ods::llm::{LLMClient, LLMResponse};
use ods::search::{SearchAgent, SearchRequest};
use ods::types::{AppError, ConversationMessage, Result, ToolCall, ToolDefinition};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

// ============= LLM =============

/// Mock LLM client returning scripted responses in order.
///
/// Once the script is exhausted the last response is repeated. Every request
/// is recorded so tests can inspect what the model was sent.
pub struct MockLLMClient {
    script: Mutex<VecDeque<LLMResponse>>,
    last: Mutex<Option<LLMResponse>>,
    should_fail: bool,
    pub requests: Mutex<Vec<Vec<ConversationMessage>>>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl MockLLMClient {
    /// Client that always answers `response` without tool calls.
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![text_response(response)])
    }

    pub fn scripted(responses: Vec<LLMResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(None),
            should_fail: false,
            requests: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::scripted(vec![])
        }
    }

    fn next_response(&self) -> LLMResponse {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = script.pop_front() {
            *last = Some(next);
        }
        last.clone().unwrap_or_else(|| text_response(""))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.next_response().content)
    }

    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.next_response())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

pub fn text_response(content: &str) -> LLMResponse {
    LLMResponse {
        content: content.to_string(),
        tool_calls: vec![],
        finish_reason: "stop".to_string(),
    }
}

pub fn tool_call_response(calls: Vec<ToolCall>) -> LLMResponse {
    LLMResponse {
        content: String::new(),
        tool_calls: calls,
        finish_reason: "tool_calls".to_string(),
    }
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

// ============= Compute =============

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum Outcome {
    Answer(ProviderResponse),
    Fail(String),
}

/// Compute provider replaying a fixed sequence of outcomes. The last outcome
/// repeats once the script runs out.
pub struct ScriptedProvider {
    script: Vec<Outcome>,
    delay: Duration,
    calls: AtomicUsize,
    pub call_times: Mutex<Vec<Instant>>,
    pub inputs: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Provider that always answers with `pods`.
    pub fn answering(pods: Vec<Pod>) -> Self {
        Self::new(vec![Outcome::Answer(ProviderResponse { pods })])
    }

    /// Provider that fails `failures` times before answering with `pods`.
    pub fn flaky(failures: usize, pods: Vec<Pod>) -> Self {
        let mut script: Vec<Outcome> = (1..=failures)
            .map(|n| Outcome::Fail(format!("transient failure {n}")))
            .collect();
        script.push(Outcome::Answer(ProviderResponse { pods }));
        Self::new(script)
    }

    /// Take `delay` to answer each query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComputeProvider for ScriptedProvider {
    async fn query(&self, input: &str) -> Result<ProviderResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        self.inputs.lock().unwrap().push(input.to_string());
        tokio::time::sleep(self.delay).await;

        let outcome = self
            .script
            .get(n)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(Outcome::Answer(ProviderResponse::default()));

        match outcome {
            Outcome::Answer(response) => Ok(response),
            Outcome::Fail(message) => Err(AppError::Provider(message)),
        }
    }
}

// ============= Search =============

/// Search agent returning a canned answer, or failing.
pub struct MockSearchAgent {
    answer: std::result::Result<String, String>,
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl MockSearchAgent {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchAgent for MockSearchAgent {
    async fn ask(&self, request: &SearchRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(message) => Err(AppError::Search(message.clone())),
        }
    }
}
