//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};

use vizlook_rs::builders::ClientConfig;
use vizlook_rs::client::{ByteStream, HttpRequest, HttpResponse, Transport, VizlookClient};
use vizlook_rs::error::{VizlookError, VizlookResult};

pub const TEST_API_KEY: &str = "test-key";

// ============================================================================
// Fixtures
// ============================================================================

/// A video in the shape shared by search results and citations.
pub fn video_json(id: &str) -> Value {
    json!({
        "url": format!("https://www.youtube.com/watch?v={id}"),
        "title": format!("Video {id}"),
        "description": "How to be productive",
        "thumbnail": {"url": format!("https://i.ytimg.com/vi/{id}/hq.jpg"), "width": 480, "height": 360},
        "author": {"name": "Ali", "url": "https://www.youtube.com/@ali", "avatar": "https://yt3.ggpht.com/ali.jpg"},
        "publishedDate": "2025-08-19T15:01:36.000Z",
        "duration": 754.2,
        "favicon": "https://www.youtube.com/favicon.ico",
        "score": 0.87,
        "highlights": [
            {"startTime": 12, "endTime": 31.5, "visualDescription": "A person at a desk", "audioTranscription": "Start early."}
        ]
    })
}

pub fn search_response_json() -> Value {
    json!({
        "results": [video_json("a1"), video_json("b2")],
        "dollarCost": {"total": 0.005, "breakdown": {"search": 0.005}}
    })
}

pub fn answer_response_json() -> Value {
    json!({
        "answer": "Start with the official tutorial.",
        "citations": [video_json("py")],
        "dollarCost": {"total": 0.01}
    })
}

pub fn video_contents_json(urls: &[Value]) -> Value {
    let results: Vec<Value> = urls
        .iter()
        .map(|url| {
            let url = url.as_str().unwrap_or_default();
            if url.contains("watch?v=") {
                json!({
                    "data": {
                        "url": url,
                        "title": "Deep work",
                        "description": "Focus",
                        "thumbnail": {"url": "https://i.ytimg.com/t.jpg", "width": 480, "height": 360},
                        "author": {"name": "Cal", "avatar": "https://yt3.ggpht.com/cal.jpg"},
                        "publishedDate": "2025-08-19T15:01:36.000Z",
                        "duration": 600,
                        "favicon": "https://www.youtube.com/favicon.ico",
                        "transcription": {
                            "videoClips": [{"startTime": 0, "endTime": 5, "visualDescription": "Intro"}],
                            "audioClips": [{"startTime": 0, "endTime": 5, "transcription": "Hello", "speakerId": "S1"}]
                        }
                    },
                    "status": {"url": url, "status": "Success", "isLiveCrawl": false}
                })
            } else {
                json!({
                    "status": {
                        "url": url,
                        "status": "Fail",
                        "error": {"type": "FAILED_TO_PARSE_URL", "message": "Not a watch URL"}
                    }
                })
            }
        })
        .collect();
    json!({
        "results": results,
        "dollarCost": {"total": 0.002, "breakdown": {"transcription": 0.002}}
    })
}

/// A complete answer stream, exactly as the server sends it.
pub fn answer_sse_body() -> String {
    let citations = json!({"type": "citations", "data": {"citations": [video_json("py")]}});
    [
        r#"data: {"type":"answer-chunk","data":"Start "}"#.to_string(),
        String::new(),
        r#"data: {"type":"answer-chunk","data":"with the tutorial. ✓"}"#.to_string(),
        String::new(),
        format!("data: {citations}"),
        String::new(),
        r#"data: {"type":"cost","data":{"dollarCost":{"total":0.01}}}"#.to_string(),
        String::new(),
        "data: [DONE]".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Split `body` into pieces of at most `size` bytes, ignoring char boundaries.
pub fn split_bytes(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}

// ============================================================================
// Mock transport
// ============================================================================

/// Records every request and replays queued responses in order.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<VizlookResult<HttpResponse>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: VizlookResult<HttpResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(Ok(HttpResponse::from_bytes(status, body.to_string())))
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> VizlookResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VizlookError::transport("mock", "no response queued")))
    }
}

/// Client over a mock transport with the test API key.
pub fn mock_client(transport: MockTransport) -> VizlookClient {
    VizlookClient::with_transport(ClientConfig::new(TEST_API_KEY), Box::new(transport))
}

/// Look up a header case-insensitively.
pub fn header_value<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

pub fn request_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or_default()).unwrap()
}

// ============================================================================
// Tracked body
// ============================================================================

/// A body stream that counts how many times it has been dropped.
pub struct TrackedBody {
    inner: ByteStream,
    releases: Arc<AtomicUsize>,
}

impl Stream for TrackedBody {
    type Item = VizlookResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Wrap `inner` so that its release can be observed through the counter.
pub fn tracked(inner: ByteStream) -> (ByteStream, Arc<AtomicUsize>) {
    let releases = Arc::new(AtomicUsize::new(0));
    let body = TrackedBody {
        inner,
        releases: releases.clone(),
    };
    (Box::pin(body), releases)
}

/// A body that yields `items` and then ends.
pub fn body_of(items: Vec<VizlookResult<Bytes>>) -> ByteStream {
    Box::pin(stream::iter(items))
}

/// A body that yields `chunks` and then never produces anything else.
pub fn stalled_body(chunks: Vec<Bytes>) -> ByteStream {
    Box::pin(
        stream::iter(chunks.into_iter().map(Ok::<Bytes, VizlookError>))
            .chain(stream::pending::<VizlookResult<Bytes>>()),
    )
}

// ============================================================================
// Test server
// ============================================================================

/// A request as seen by the test server.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct ServerState {
    pub received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl ServerState {
    fn record(&self, path: &str, headers: &HeaderMap, body: &Value) {
        self.received.lock().unwrap().push(ReceivedRequest {
            path: path.to_string(),
            headers: headers.clone(),
            body: body.clone(),
        });
    }

    pub fn last(&self) -> ReceivedRequest {
        self.received
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("server received no request")
    }
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if key == Some(TEST_API_KEY) {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid API key", "requestId": "req-401"})),
            )
                .into_response(),
        )
    }
}

async fn search_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/search", &headers, &body);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    Json(search_response_json()).into_response()
}

async fn answer_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/answer", &headers, &body);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    if body["query"] == "rate limit me" {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too many requests", "retryAfter": 2})),
        )
            .into_response();
    }
    if body["stream"] != true {
        return Json(answer_response_json()).into_response();
    }

    // Deliver the stream in small pieces that split frames and multibyte chars.
    let chunks = split_bytes(&answer_sse_body(), 7);
    let body = stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok::<Bytes, std::io::Error>(chunk)
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(body),
    )
        .into_response()
}

async fn videos_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/videos", &headers, &body);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let urls = body["urls"].as_array().cloned().unwrap_or_default();
    Json(video_contents_json(&urls)).into_response()
}

/// Start a fake Vizlook API on a random port. Returns its base URL, shared
/// state and the server task handle.
pub async fn start_test_server() -> (String, ServerState, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let state = ServerState::default();
    let app = Router::new()
        .route("/search", post(search_handler))
        .route("/answer", post(answer_handler))
        .route("/videos", post(videos_handler))
        .with_state(state.clone());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (base_url, state, handle)
}

/// Client pointed at the test server with the given API key.
pub fn server_client(base_url: &str, api_key: &str) -> VizlookClient {
    VizlookClient::builder()
        .with_api_key(api_key)
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
