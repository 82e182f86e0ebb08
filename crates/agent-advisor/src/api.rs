//! HTTP surface of the answer service

use crate::AnswerService;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

const NO_QUESTION: &str = "No question provided";
const INTERNAL_ERROR: &str = "Internal server error";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Answer generator
    pub service: Arc<AnswerService>,
}

/// Successful answer body
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    /// Cleaned answer text
    pub answer: String,
}

/// Error responses, always rendered as `{"error": message}`
#[derive(Debug)]
pub enum ApiError {
    /// The request was rejected before any work was done
    BadRequest(&'static str),
    /// Something failed downstream; details stay in the logs
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the router with CORS restricted to `cors_origin`
pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/get_answer", post(get_answer).options(preflight))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}

/// Extract a non-blank `question` string from a JSON body, as sent
fn question_from(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.trim().is_empty())
        .map(str::to_string)
}

async fn get_answer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, ApiError> {
    let question = question_from(&body).ok_or(ApiError::BadRequest(NO_QUESTION))?;

    match state.service.answer(&question).await {
        Ok(answer) => Ok(Json(AnswerResponse { answer })),
        Err(e) => {
            error!(error = %e, "Error generating answer");
            Err(ApiError::Internal)
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_extraction() {
        assert_eq!(
            question_from(br#"{"question": " Rent or buy? "}"#).as_deref(),
            Some(" Rent or buy? ")
        );
        assert_eq!(question_from(br#"{"question": ""}"#), None);
        assert_eq!(question_from(br#"{"question": "   "}"#), None);
        assert_eq!(question_from(br#"{"question": 42}"#), None);
        assert_eq!(question_from(br"{}"), None);
        assert_eq!(question_from(b"not json"), None);
        assert_eq!(question_from(b""), None);
    }
}
