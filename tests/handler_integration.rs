/// Integration tests for the question handler wired to a real client.
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use storeqa::{
    AiServiceClientBuilder, HandlerResponse, QuestionHandler, QuestionParams, ServiceConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a handler for `base_url` and runs `params` through it off the async runtime.
async fn handle(base_url: String, params: QuestionParams) -> HandlerResponse {
    tokio::task::spawn_blocking(move || {
        let client = AiServiceClientBuilder::new()
            .config(ServiceConfig {
                base_url,
                timeout: Duration::from_secs(5),
                connect_timeout: Duration::from_secs(1),
            })
            .build()
            .expect("Failed to create AI service client");
        QuestionHandler::new(Arc::new(client)).handle(&params)
    })
    .await
    .expect("blocking handler panicked")
}

#[tokio::test]
async fn valid_question_returns_service_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"answer": "9-5", "confidence": "high"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = handle(
        server.uri(),
        QuestionParams::new("store-42", "What are your hours?"),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"answer": "9-5", "confidence": "high"}));
}

#[tokio::test]
async fn blank_question_never_reaches_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let response = handle(server.uri(), QuestionParams::new("store-42", "")).await;

    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        json!({"error": "store_id and question are required"})
    );
}

#[tokio::test]
async fn service_failure_is_reported_in_band() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let response = handle(
        server.uri(),
        QuestionParams::new("store-42", "How many repeat customers?"),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["answer"], "AI service unavailable");
    assert_eq!(response.body["confidence"], "low");
    assert!(response.body["error"].as_str().is_some_and(|e| !e.is_empty()));
}
