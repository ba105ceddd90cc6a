//! Search providers and the answering agent against mock HTTP servers.

mod common;

use common::mocks::MockLLMClient;
use ods::search::{DeepSearchAgent, SearchAgent, SearchProvider, SearchRequest, SearxngProvider, SerperProvider};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn serper_body(server: &str) -> serde_json::Value {
    json!({
        "searchParameters": {"q": "rust release"},
        "answerBox": {"snippet": "Rust 1.0 was released on May 15, 2015."},
        "organic": [
            {"title": "Announcing Rust 1.0", "link": format!("{server}/blog"), "snippet": "The first stable release"},
            {"title": "Rust (programming language)", "link": format!("{server}/wiki"), "snippet": "Rust is a language"},
            {"title": "Third result", "link": format!("{server}/third"), "snippet": "more"}
        ]
    })
}

async fn serper_agent(server: &MockServer, llm: Option<Arc<MockLLMClient>>) -> DeepSearchAgent {
    let provider = SerperProvider::new(reqwest::Client::new(), "serper-key")
        .with_endpoint(format!("{}/search", server.uri()));
    DeepSearchAgent::new(
        Arc::new(provider),
        llm.map(|l| l as Arc<dyn ods::LLMClient>),
    )
}

// ============= Providers =============

#[tokio::test]
async fn test_serper_request_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("X-API-KEY", "serper-key"))
        .and(body_json(json!({"q": "when was rust released", "num": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let provider = SerperProvider::new(reqwest::Client::new(), "serper-key")
        .with_endpoint(format!("{}/search", server.uri()));
    let results = provider.search("when was rust released", 2).await.unwrap();

    assert_eq!(
        results.answer.as_deref(),
        Some("Rust 1.0 was released on May 15, 2015.")
    );
    assert_eq!(results.hits.len(), 2);
    assert_eq!(results.hits[0].title, "Announcing Rust 1.0");
    assert_eq!(results.hits[1].snippet, "Rust is a language");
}

#[tokio::test]
async fn test_serper_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let provider = SerperProvider::new(reqwest::Client::new(), "bad-key")
        .with_endpoint(format!("{}/search", server.uri()));
    let err = provider.search("q", 2).await.unwrap_err();
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_searxng_request_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "tokio runtime"))
        .and(query_param("format", "json"))
        .and(header("Authorization", "Bearer sx-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "tokio runtime",
            "results": [
                {"url": "https://tokio.rs", "title": "Tokio", "content": "An asynchronous runtime"},
                {"title": "no url, skipped"},
                {"url": "https://docs.rs/tokio", "title": "tokio - Rust"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = SearxngProvider::new(
        reqwest::Client::new(),
        format!("{}/", server.uri()),
        Some("sx-key".to_string()),
    );
    let results = provider.search("tokio runtime", 5).await.unwrap();

    assert!(results.answer.is_none());
    assert_eq!(results.hits.len(), 2);
    assert_eq!(results.hits[0].snippet, "An asynchronous runtime");
    assert_eq!(results.hits[1].url, "https://docs.rs/tokio");
    assert_eq!(results.hits[1].snippet, "");
}

// ============= Agent =============

#[tokio::test]
async fn test_agent_without_model_returns_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .mount(&server)
        .await;

    let agent = serper_agent(&server, None).await;
    let context = agent
        .ask(&SearchRequest::new("when was rust released"))
        .await
        .unwrap();

    assert!(context.starts_with("Answer: Rust 1.0 was released on May 15, 2015."));
    assert!(context.contains("[1] Announcing Rust 1.0"));
    assert!(context.contains("[2] Rust (programming language)"));
    assert!(!context.contains("[3]"));
}

#[tokio::test]
async fn test_agent_with_model_answers_from_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .mount(&server)
        .await;

    let llm = Arc::new(MockLLMClient::new("Rust 1.0 shipped on May 15, 2015 [1]."));
    let agent = serper_agent(&server, Some(llm.clone())).await;

    let answer = agent
        .ask(&SearchRequest::new("when was rust released"))
        .await
        .unwrap();
    assert_eq!(answer, "Rust 1.0 shipped on May 15, 2015 [1].");

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let (system, prompt) = &prompts[0];
    assert!(system.contains("[n]"));
    assert!(prompt.contains("[1] Announcing Rust 1.0"));
    assert!(prompt.ends_with("Question: when was rust released"));
}

#[tokio::test]
async fn test_agent_no_results_skips_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .mount(&server)
        .await;

    let llm = Arc::new(MockLLMClient::new("should not be used"));
    let agent = serper_agent(&server, Some(llm.clone())).await;

    let answer = agent.ask(&SearchRequest::new("xyzzy plugh")).await.unwrap();
    assert_eq!(answer, "No search results found for: xyzzy plugh");
    assert!(llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_agent_model_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .mount(&server)
        .await;

    let agent = serper_agent(&server, Some(Arc::new(MockLLMClient::failing()))).await;
    assert!(agent.ask(&SearchRequest::new("q")).await.is_err());
}

#[tokio::test]
async fn test_pro_mode_reads_source_pages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><nav>Menu</nav><p>Today we are very proud to announce the 1.0 release.</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let agent = serper_agent(&server, None).await;
    let request = SearchRequest {
        pro_mode: true,
        ..SearchRequest::new("when was rust released")
    };
    let context = agent.ask(&request).await.unwrap();

    assert!(context.contains("Excerpt: Today we are very proud to announce the 1.0 release."));
    assert!(!context.contains("Menu"));
    // The failed page is skipped, its search snippet is kept.
    assert!(context.contains("[2] Rust (programming language)"));
    assert_eq!(context.matches("Excerpt:").count(), 1);
}

#[tokio::test]
async fn test_max_sources_limits_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"q": "rust", "num": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serper_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let agent = serper_agent(&server, None).await;
    let request = SearchRequest {
        max_sources: 1,
        ..SearchRequest::new("rust")
    };
    let context = agent.ask(&request).await.unwrap();

    assert!(context.contains("[1]"));
    assert!(!context.contains("[2]"));
}
