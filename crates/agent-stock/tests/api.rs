//! Analysis service API tests
//!
//! The router runs in-process with a stub orchestrator that walks the tasks
//! without calling a model. Progress is observed through a hub subscription
//! opened before the request.

use agent_core::Error;
use agent_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider};
use agent_stock::progress::{ProgressEnvelope, ProgressHub, SessionSubscription};
use agent_stock::{AppState, StockAnalysisAgents, StockAnalysisTasks, StockConfig, create_router};
use agent_workflow::{Crew, CrewObserver, CrewOutput, Orchestrator};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

struct NoModel;

#[async_trait]
impl LLMProvider for NoModel {
    async fn complete(&self, _request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
        Err(LLMError::RequestFailed("no model in tests".to_string()))
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Walks the crew's tasks, failing at `fail_at` if set
struct StubOrchestrator {
    fail_at: Option<usize>,
    result: &'static str,
    runs: AtomicUsize,
}

impl StubOrchestrator {
    fn new(fail_at: Option<usize>, result: &'static str) -> Arc<Self> {
        Arc::new(Self {
            fail_at,
            result,
            runs: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Orchestrator for StubOrchestrator {
    async fn kickoff(
        &self,
        crew: Crew,
        observer: Arc<dyn CrewObserver>,
    ) -> agent_core::Result<CrewOutput> {
        self.runs.fetch_add(1, Ordering::SeqCst);

        for (index, task) in crew.tasks().iter().enumerate() {
            observer.on_task_start(index, task);
            if self.fail_at == Some(index) {
                return Err(Error::TaskFailed {
                    task: task.name().to_string(),
                    reason: "rate limit exceeded".to_string(),
                });
            }
            observer.on_task_complete(index, task, "done");
        }

        Ok(CrewOutput {
            final_output: self.result.to_string(),
            task_outputs: Vec::new(),
        })
    }
}

fn app(orchestrator: Arc<StubOrchestrator>, hub: ProgressHub) -> Router {
    let config = Arc::new(StockConfig::builder().api_key("gsk_test").build().unwrap());
    let state = AppState {
        agents: Arc::new(StockAnalysisAgents::new(Arc::new(NoModel), config).unwrap()),
        tasks: Arc::new(StockAnalysisTasks::new().unwrap()),
        orchestrator,
        hub,
    };
    create_router(state, "http://localhost:5173")
}

fn post_analysis(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/run_financial_analysis")
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

fn drain(subscription: &mut SessionSubscription) -> Vec<(String, String)> {
    std::iter::from_fn(|| subscription.try_recv())
        .map(|ProgressEnvelope { event, data, .. }| (event.to_string(), data))
        .collect()
}

fn progress(messages: &[&str]) -> Vec<(String, String)> {
    messages
        .iter()
        .map(|m| ("analysis_progress".to_string(), (*m).to_string()))
        .collect()
}

const STAGES: [&str; 7] = [
    "Initializing research analyst...",
    "Initializing financial analyst...",
    "Initializing investment advisor...",
    "Starting research analysis for AAPL...",
    "Conducting financial analysis...",
    "Analyzing financial filings...",
    "Preparing investment recommendations...",
];

#[tokio::test]
async fn test_successful_analysis() {
    let hub = ProgressHub::default();
    let mut listener = hub.subscribe("s-ok");
    let orchestrator = StubOrchestrator::new(None, "BUY");

    let resp = app(orchestrator.clone(), hub)
        .oneshot(post_analysis(r#"{"company": "AAPL", "session_id": "s-ok"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"result": "BUY"}));

    let mut expected = progress(&STAGES);
    expected.push(("analysis_complete".to_string(), "BUY".to_string()));
    assert_eq!(drain(&mut listener), expected);
    assert_eq!(orchestrator.runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_at_third_task() {
    let hub = ProgressHub::default();
    let mut listener = hub.subscribe("s-fail");

    let resp = app(StubOrchestrator::new(Some(2), ""), hub)
        .oneshot(post_analysis(r#"{"company": "AAPL", "session_id": "s-fail"}"#))
        .await
        .unwrap();

    let message = "Task 'filings_analysis' failed: rate limit exceeded";
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await, json!({"error": message}));

    let mut expected = progress(&STAGES[..6]);
    expected.push(("analysis_error".to_string(), message.to_string()));
    assert_eq!(drain(&mut listener), expected);
}

#[tokio::test]
async fn test_missing_company_returns_400_without_events() {
    let bodies = [
        "{}",
        r#"{"company": ""}"#,
        r#"{"company": "   "}"#,
        r#"{"company": null}"#,
        "not json",
    ];

    for body in bodies {
        let hub = ProgressHub::default();
        let mut listener = hub.subscribe("s-bad");
        let orchestrator = StubOrchestrator::new(None, "BUY");

        let resp = app(orchestrator.clone(), hub)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/run_financial_analysis")
                    .header("x-session-id", "s-bad")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(
            json_body(resp).await,
            json!({"error": "Company symbol is required"})
        );
        assert!(drain(&mut listener).is_empty());
        assert_eq!(orchestrator.runs.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_session_header_scopes_events() {
    let hub = ProgressHub::default();
    let mut mine = hub.subscribe("from-header");
    let mut other = hub.subscribe("someone-else");

    let resp = app(StubOrchestrator::new(None, "HOLD"), hub)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/run_financial_analysis")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-session-id", "from-header")
                .body(Body::from(r#"{"company": "AAPL"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(drain(&mut mine).len(), 8);
    assert!(drain(&mut other).is_empty());
}

#[tokio::test]
async fn test_progress_requires_session_id() {
    let resp = app(StubOrchestrator::new(None, "BUY"), ProgressHub::default())
        .oneshot(
            Request::builder()
                .uri("/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_cors_preflight_allows_origin() {
    let resp = app(StubOrchestrator::new(None, "BUY"), ProgressHub::default())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/run_financial_analysis")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
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
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_health() {
    let resp = app(StubOrchestrator::new(None, "BUY"), ProgressHub::default())
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

/// Open a WebSocket on `/progress` with a hand-written upgrade request
async fn connect_progress(addr: std::net::SocketAddr, session_id: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /progress?session_id={session_id} HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Connection: Upgrade\r\n\
         Upgrade: websocket\r\n\
         Sec-WebSocket-Version: 13\r\n\
         Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut head = Vec::new();
    while !head.ends_with(b"\r\n\r\n") {
        head.push(stream.read_u8().await.unwrap());
    }
    let head = String::from_utf8(head).unwrap();
    assert!(head.starts_with("HTTP/1.1 101"), "{head}");
    stream
}

/// Read one unmasked server text frame
async fn read_text_frame(stream: &mut TcpStream) -> Value {
    let opcode = stream.read_u8().await.unwrap();
    assert_eq!(opcode, 0x81, "expected a final text frame");

    let len = match stream.read_u8().await.unwrap() {
        126 => usize::from(stream.read_u16().await.unwrap()),
        127 => usize::try_from(stream.read_u64().await.unwrap()).unwrap(),
        len => usize::from(len),
    };
    let mut payload = vec![0; len];
    stream.read_exact(&mut payload).await.unwrap();
    serde_json::from_slice(&payload).unwrap()
}

#[tokio::test]
async fn test_progress_websocket_streams_session_events() {
    let hub = ProgressHub::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(StubOrchestrator::new(None, "BUY"), hub);
    tokio::spawn(async move { axum::serve(listener, router).await });

    let mut socket = connect_progress(addr, "ws-1").await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/run_financial_analysis"))
        .json(&json!({"company": "AAPL", "session_id": "ws-1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let other = reqwest::Client::new()
        .post(format!("http://{addr}/run_financial_analysis"))
        .json(&json!({"company": "MSFT", "session_id": "ws-2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(other.status().as_u16(), 200);

    let mut frames = Vec::new();
    for _ in 0..8 {
        frames.push(read_text_frame(&mut socket).await);
    }

    for frame in &frames {
        assert_eq!(frame["session_id"], "ws-1");
        assert!(frame["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    }
    let events: Vec<(String, String)> = frames
        .iter()
        .map(|f| {
            (
                f["event"].as_str().unwrap().to_string(),
                f["data"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    let mut expected = progress(&STAGES);
    expected.push(("analysis_complete".to_string(), "BUY".to_string()));
    assert_eq!(events, expected);

    let leaked = tokio::time::timeout(Duration::from_millis(200), socket.read_u8()).await;
    assert!(leaked.is_err(), "events of another session reached the listener");
}
