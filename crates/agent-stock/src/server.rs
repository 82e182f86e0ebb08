//! HTTP surface of the analysis service
//!
//! `POST /run_financial_analysis` runs one crew and blocks until it is done.
//! `GET /progress?session_id=..` upgrades to a WebSocket streaming the
//! progress events of that session as JSON text frames.

use crate::agents::StockAnalysisAgents;
use crate::crew::FinancialCrew;
use crate::progress::{ProgressHub, SessionSubscription};
use crate::tasks::StockAnalysisTasks;
use agent_workflow::Orchestrator;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPANY_REQUIRED: &str = "Company symbol is required";

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Builds the three analysts of each run
    pub agents: Arc<StockAnalysisAgents>,
    /// Compiled task templates
    pub tasks: Arc<StockAnalysisTasks>,
    /// Engine running the crew
    pub orchestrator: Arc<dyn Orchestrator>,
    /// Progress events of every session
    pub hub: ProgressHub,
}

/// Validated analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Company or ticker to analyze, trimmed
    pub company: String,
    /// Session the progress events are published under
    pub session_id: String,
}

impl AnalysisRequest {
    /// Parse the body and headers; `None` when no company is given
    ///
    /// The session id comes from the body, then the `X-Session-Id` header,
    /// and is generated when neither is present.
    pub fn parse(body: &[u8], headers: &HeaderMap) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let non_blank = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let company = non_blank(value.get("company").and_then(Value::as_str))?;
        let session_id = non_blank(value.get("session_id").and_then(Value::as_str))
            .or_else(|| non_blank(headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Some(Self {
            company,
            session_id,
        })
    }
}

/// Successful analysis body
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    /// Final investment recommendation
    pub result: String,
}

/// Error responses, rendered as `{"error": message}`
#[derive(Debug)]
pub enum ApiError {
    /// Rejected before any progress event is emitted
    BadRequest(&'static str),
    /// The run failed; the message is returned as is
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ProgressQuery {
    session_id: String,
}

/// Build the router with CORS restricted to `cors_origin`
pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/run_financial_analysis", post(run_financial_analysis))
        .route("/progress", get(progress))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(SESSION_HEADER),
        ]);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}

async fn run_financial_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request =
        AnalysisRequest::parse(&body, &headers).ok_or(ApiError::BadRequest(COMPANY_REQUIRED))?;

    let sink = Arc::new(state.hub.publisher(&request.session_id));
    let crew = FinancialCrew::new(request.company, request.session_id, sink);

    crew.run(&state.agents, &state.tasks, state.orchestrator.as_ref())
        .await
        .map(|result| Json(AnalysisResponse { result }))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let subscription = state.hub.subscribe(&query.session_id);
    info!(session_id = %query.session_id, "Progress listener connected");
    ws.on_upgrade(move |socket| stream_progress(socket, subscription))
}

async fn stream_progress(socket: WebSocket, mut subscription: SessionSubscription) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(envelope) = subscription.recv().await {
            let frame = match serde_json::to_string(&envelope) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Failed to encode progress event");
                    continue;
                }
            };
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Incoming frames are ignored; the loop only watches for the close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    debug!("Progress listener disconnected");
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_and_session() {
        let headers = HeaderMap::new();
        let request =
            AnalysisRequest::parse(br#"{"company": " AAPL ", "session_id": "s-1"}"#, &headers)
                .unwrap();
        assert_eq!(request.company, "AAPL");
        assert_eq!(request.session_id, "s-1");
    }

    #[test]
    fn test_session_from_header_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("from-header"));
        let request = AnalysisRequest::parse(br#"{"company": "AAPL"}"#, &headers).unwrap();
        assert_eq!(request.session_id, "from-header");

        let request = AnalysisRequest::parse(br#"{"company": "AAPL"}"#, &HeaderMap::new()).unwrap();
        assert!(Uuid::parse_str(&request.session_id).is_ok());
    }

    #[test]
    fn test_missing_company() {
        let headers = HeaderMap::new();
        let bodies: [&[u8]; 6] = [
            b"{}",
            br#"{"company": ""}"#,
            br#"{"company": "  "}"#,
            br#"{"company": 1}"#,
            b"nope",
            b"",
        ];
        for body in bodies {
            assert_eq!(AnalysisRequest::parse(body, &headers), None);
        }
    }

    #[test]
    fn test_internal_error_keeps_message() {
        let response = ApiError::Internal("Task 'research' failed: timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
