//! Scripted REST API mock

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use cord_common::{ClientConfig, Token};
use cord_rest::{ReqwestTransport, RestClient, RestDispatcher};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// API version the mock serves
pub const API_VERSION: u8 = 10;

/// Token every mock client authenticates with
pub const TEST_TOKEN: &str = "test-token";

/// One scripted reply
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 429 with the platform's body and `Retry-After` header
    pub fn rate_limited(retry_after: f64, global: bool) -> Self {
        let mut response = Self::status(
            429,
            json!({
                "message": "You are being rate limited.",
                "retry_after": retry_after,
                "global": global
            }),
        )
        .with_header("retry-after", retry_after.ceil().to_string());
        if global {
            response = response.with_header("x-ratelimit-global", "true");
        }
        response
    }

    /// Platform error body, e.g. `50013 Missing Permissions`
    pub fn error(status: u16, code: u32, message: &str) -> Self {
        Self::status(status, json!({"code": code, "message": message}))
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = Response::builder().status(status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let body = match self.body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        builder
            .body(body)
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

/// A request as the mock received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to the versioned API root
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), path)
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let prefix = format!("/api/v{API_VERSION}");
    let path = uri
        .path()
        .strip_prefix(prefix.as_str())
        .unwrap_or(uri.path())
        .to_string();

    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        body: serde_json::from_slice(&body).ok(),
    };
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(recorded);
    }

    // The last scripted response repeats
    let response = state.routes.lock().ok().and_then(|mut routes| {
        let queue = routes.get_mut(&route_key(method.as_str(), &path))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    });

    response
        .unwrap_or_else(|| MockResponse::error(404, 0, "404: Not Found"))
        .into_response()
}

/// REST mock bound to an ephemeral port
pub struct MockApi {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    _handle: JoinHandle<()>,
}

impl MockApi {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Unversioned API root, as `CORD_API_URL` would hold it
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Queue a response for `METHOD path`
    pub fn on(&self, method: &str, path: &str, response: MockResponse) {
        if let Ok(mut routes) = self.state.routes.lock() {
            routes
                .entry(route_key(method, path))
                .or_default()
                .push_back(response);
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method.eq_ignore_ascii_case(method) && request.path == path)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(TEST_TOKEN);
        config.rest.api_url = self.api_url();
        config.rest.api_version = API_VERSION;
        config.rest.request_timeout_secs = 5;
        config
    }

    /// Client with a short server-error backoff
    pub fn client(&self) -> Result<RestClient> {
        self.client_with(&self.config())
    }

    pub fn client_with(&self, config: &ClientConfig) -> Result<RestClient> {
        let token = Token::bot(config.token.as_str())?;
        let dispatcher = RestDispatcher::new(
            &token,
            &config.rest,
            Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        )?
        .with_retry_backoff(Duration::from_millis(10));
        Ok(RestClient::from_dispatcher(dispatcher))
    }
}
