//! In-process mock of the qTrade HTTP API for integration tests

#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{HeaderMap, StatusCode},
    response::Response,
    Router,
};
use qtrade_rest::{ClientConfig, QtradeRestClient};
use tokio::sync::Mutex;

pub const TEST_KEYPAIR: &str = "1:1111111111111111111111111111111111111111111111111111111111111111";

/// What the mock server saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus `?query` when present, as signed by the client
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Request body is not JSON: {e}"))
    }
}

/// Canned response returned by a test handler
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Held before the response is written
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: None,
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn fixture(filename: &str) -> Self {
        Self::ok(load_test_data(filename))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_response(self) -> Response {
        let mut builder = Response::builder()
            .status(self.status)
            .header("content-type", "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Body::from(self.body)).unwrap()
    }
}

type Handler = Arc<dyn Fn(usize, &RecordedRequest) -> MockResponse + Send + Sync>;

#[derive(Default)]
pub struct TestServerState {
    pub request_count: AtomicUsize,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<TestServerState>,
}

impl MockServer {
    /// Start a server answering every request with `handler`
    ///
    /// The handler receives the zero-based index of the request.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(usize, &RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let state = Arc::new(TestServerState::default());
        let handler: Handler = Arc::new(handler);

        let app = {
            let state = state.clone();
            Router::new().fallback(move |req: Request| {
                let state = state.clone();
                let handler = handler.clone();
                async move { mock_handler(req, state, handler).await }
            })
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Serve one fixture for every request
    pub async fn with_fixture(filename: &'static str) -> Self {
        Self::start(move |_, _| MockResponse::fixture(filename)).await
    }

    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> RecordedRequest {
        self.requests()
            .await
            .pop()
            .expect("mock server received no requests")
    }

    /// Config pointing at this server, fast retries, no credentials
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_endpoint(self.base_url.clone())
            .with_timeout(10)
            .with_max_retries(1)
            .with_backoff(Duration::from_millis(10))
    }

    pub fn public_client(&self) -> QtradeRestClient {
        QtradeRestClient::with_config(self.config()).unwrap()
    }

    pub fn private_client(&self) -> QtradeRestClient {
        QtradeRestClient::with_config(self.config().with_hmac_keypair(TEST_KEYPAIR)).unwrap()
    }
}

async fn mock_handler(req: Request, state: Arc<TestServerState>, handler: Handler) -> Response {
    let index = state.request_count.fetch_add(1, Ordering::SeqCst);

    let method = req.method().to_string();
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let headers = req.headers().clone();
    let body = to_bytes(req.into_body(), usize::MAX)
        .await
        .map(|b| b.to_vec())
        .unwrap_or_default();

    let recorded = RecordedRequest {
        method,
        uri,
        headers,
        body,
    };
    let response = handler(index, &recorded);
    state.requests.lock().await.push(recorded);

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    response.into_response()
}

fn manifest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn load_test_data(filename: &str) -> String {
    let path = manifest_path().join("test_data").join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data from {path:?}: {e}"))
}

/// Address with nothing listening on it
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
