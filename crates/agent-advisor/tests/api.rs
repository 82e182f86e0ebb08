//! Answer service API tests
//!
//! Build the router in-process with a mocked provider and drive it with
//! `tower::ServiceExt::oneshot()`.

use agent_advisor::{AnswerService, AppState, create_router};
use agent_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use mockall::mock;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

const ORIGIN: &str = "http://localhost:5173";

fn completion(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 250,
            output_tokens: 40,
        },
    }
}

fn app(provider: MockProvider) -> Router {
    let service = AnswerService::new(Arc::new(provider), "llama3-8b-8192").unwrap();
    create_router(
        AppState {
            service: Arc::new(service),
        },
        ORIGIN,
    )
}

fn post_answer(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/get_answer")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Missing, empty, blank and non-string questions are rejected without a call.
#[tokio::test]
async fn test_missing_question_returns_400_without_call() {
    let bodies = [
        "{}",
        r#"{"question": ""}"#,
        r#"{"question": "   "}"#,
        r#"{"question": null}"#,
        r#"{"question": 7}"#,
        "not json",
        "",
    ];

    for body in bodies {
        let mut provider = MockProvider::new();
        provider.expect_complete().never();

        let resp = app(provider).oneshot(post_answer(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(
            json_body(resp).await,
            json!({"error": "No question provided"})
        );
    }
}

/// Quote characters are stripped from the completion text.
#[tokio::test]
async fn test_answer_strips_quotes() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .times(1)
        .returning(|_| Ok(completion("As a Financial Advisor, I'd say \"it depends\".")));

    let resp = app(provider)
        .oneshot(post_answer(r#"{"question": "Should I pay cash for a house?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({"answer": "As a Financial Advisor, I'd say it depends."})
    );
}

/// The outbound request carries the fixed sampling parameters.
#[tokio::test]
async fn test_request_parameters() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .withf(|req: &CompletionRequest| {
            req.model == "llama3-8b-8192"
                && req.temperature == Some(0.5)
                && req.top_p == Some(0.95)
                && req.frequency_penalty == Some(0.0)
                && req.presence_penalty == Some(0.0)
                && req.max_tokens == 300
                && req.stop_sequences.is_none()
                && req.tools.is_none()
                && req.messages.len() == 2
                && req.messages[0]
                    .text()
                    .is_some_and(|s| s.contains("Q: Is gold a good hedge?"))
                && req.messages[1].text() == Some("Is gold a good hedge?")
        })
        .times(1)
        .returning(|_| Ok(completion("As a Financial Advisor, sometimes.")));

    let resp = app(provider)
        .oneshot(post_answer(r#"{"question": "Is gold a good hedge?"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

/// The question reaches the model exactly as sent.
#[tokio::test]
async fn test_question_forwarded_verbatim() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .withf(|req: &CompletionRequest| {
            req.messages[1].text() == Some("  Is gold a good hedge?\n")
                && req.messages[0]
                    .text()
                    .is_some_and(|s| s.contains("Q:   Is gold a good hedge?\n"))
        })
        .times(1)
        .returning(|_| Ok(completion("As a Financial Advisor, sometimes.")));

    let resp = app(provider)
        .oneshot(post_answer(r#"{"question": "  Is gold a good hedge?\n"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Provider failures surface as a generic 500 without details.
#[tokio::test]
async fn test_provider_failure_returns_generic_500() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .times(1)
        .returning(|_| Err(LLMError::RequestFailed("connection reset by peer".to_string())));

    let resp = app(provider)
        .oneshot(post_answer(r#"{"question": "What is a Roth IRA?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body, json!({"error": "Internal server error"}));
}

/// Concurrent requests get independent answers.
#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let mut provider = MockProvider::new();
    provider.expect_complete().times(2).returning(|req| {
        let question = req.messages[1].text().unwrap_or_default().to_string();
        Ok(completion(&format!("As a Financial Advisor: {question}")))
    });

    let app = app(provider);
    let (first, second) = tokio::join!(
        app.clone()
            .oneshot(post_answer(r#"{"question": "Rent or buy?"}"#)),
        app.clone()
            .oneshot(post_answer(r#"{"question": "Stocks or bonds?"}"#)),
    );

    assert_eq!(
        json_body(first.unwrap()).await,
        json!({"answer": "As a Financial Advisor: Rent or buy?"})
    );
    assert_eq!(
        json_body(second.unwrap()).await,
        json!({"answer": "As a Financial Advisor: Stocks or bonds?"})
    );
}

/// A bare OPTIONS request is answered with 200 and an empty body.
#[tokio::test]
async fn test_options_returns_empty_200() {
    let resp = app(MockProvider::new())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/get_answer")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

/// A CORS preflight from the configured origin is allowed.
#[tokio::test]
async fn test_cors_preflight_allows_origin() {
    let resp = app(MockProvider::new())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/get_answer")
                .header(header::ORIGIN, ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
}

#[tokio::test]
async fn test_health() {
    let resp = app(MockProvider::new())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"status": "ok"}));
}
