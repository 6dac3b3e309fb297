//! Wiremock tests for the Gemini client and the model fallback chain over it.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use futplot::config::GenerationConfig;
use futplot::{FallbackInvoker, FutplotError, GeminiClient, GenerateProvider};

const MODELS: [&str; 3] = [
    "gemini-2.5-flash-lite",
    "gemini-2.5-flash",
    "gemini-3-flash-preview",
];

fn model_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    }))
}

fn config_for(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        models: MODELS.iter().map(|m| m.to_string()).collect(),
        base_url: server.uri(),
        attempt_timeout_secs: 5,
    }
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn sends_prompt_and_key_and_extracts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path("gemini-2.5-flash")))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({"contents": [{"parts": [{"text": "hello"}]}]})))
        .respond_with(text_response("world"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("test-key", server.uri()).unwrap();
    let model = client.model("gemini-2.5-flash");
    assert_eq!(model.name(), "gemini-2.5-flash");
    assert_eq!(model.generate("hello").await.unwrap(), "world");
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k", server.uri()).unwrap();
    let err = client.generate_content("p", "m").await.unwrap_err();
    match err {
        FutplotError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn auth_failure_and_server_error_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path("denied")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path("broken")))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k", server.uri()).unwrap();
    assert!(matches!(
        client.generate_content("p", "denied").await,
        Err(FutplotError::AuthenticationFailed)
    ));
    match client.generate_content("p", "broken").await {
        Err(FutplotError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_text_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k", server.uri()).unwrap();
    assert!(matches!(
        client.generate_content("p", "m").await,
        Err(FutplotError::EmptyResponse)
    ));
}

#[test]
fn blank_key_is_configuration_error() {
    assert!(matches!(
        GeminiClient::new("  "),
        Err(FutplotError::Configuration(_))
    ));
}

// ============================================================================
// Fallback chain
// ============================================================================

/// First `k` models fail, model `k + 1` answers: exactly `k + 1` attempts
/// in priority order, and the result comes from model `k + 1`.
#[tokio::test]
async fn first_k_failures_then_success() {
    for k in 0..MODELS.len() {
        let server = MockServer::start().await;
        for (i, model) in MODELS.iter().enumerate() {
            let response = if i < k {
                ResponseTemplate::new(503)
            } else {
                text_response(&format!("from {model}"))
            };
            let expected = if i <= k { 1 } else { 0 };
            Mock::given(method("POST"))
                .and(path(model_path(model)))
                .respond_with(response)
                .expect(expected)
                .mount(&server)
                .await;
        }

        let invoker = FallbackInvoker::from_config(&config_for(&server), Some("k")).unwrap();
        let result = invoker.generate("prompt").await.unwrap();
        assert_eq!(result.served_by, MODELS[k]);
        assert_eq!(result.raw_text, format!("from {}", MODELS[k]));

        let requests = server.received_requests().await.unwrap();
        let order: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
        let expected_order: Vec<String> = MODELS[..=k].iter().map(|m| model_path(m)).collect();
        assert_eq!(order, expected_order, "k = {k}");
    }
}

#[tokio::test]
async fn every_model_failing_exhausts_with_reasons() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path(MODELS[0])))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path(MODELS[1])))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path(MODELS[2])))
        .respond_with(text_response("   "))
        .mount(&server)
        .await;

    let invoker = FallbackInvoker::from_config(&config_for(&server), Some("k")).unwrap();
    let err = invoker.generate("prompt").await.unwrap_err();
    assert_eq!(err.status_code(), 503);

    let failures = err.endpoint_failures();
    let endpoints: Vec<_> = failures.iter().map(|f| f.endpoint.as_str()).collect();
    assert_eq!(endpoints, MODELS);
    assert!(failures[0].reason.contains("rate limited"));
    assert!(failures[1].reason.contains("unreadable"));
    assert!(failures[2].reason.contains("empty"));
}

#[tokio::test]
async fn slow_model_times_out_and_next_answers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path(MODELS[0])))
        .respond_with(text_response("too late").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path(MODELS[1])))
        .respond_with(text_response("on time"))
        .mount(&server)
        .await;

    let invoker = FallbackInvoker::from_config(&config_for(&server), Some("k"))
        .unwrap()
        .attempt_timeout(Duration::from_millis(200));
    let result = invoker.generate("prompt").await.unwrap();
    assert_eq!(result.served_by, MODELS[1]);
    assert_eq!(result.raw_text, "on time");
}
