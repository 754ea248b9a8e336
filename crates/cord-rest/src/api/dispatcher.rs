//! Request dispatcher - rate limiting, retries and error typing around a
//! [`HttpTransport`]

use std::sync::Arc;
use std::time::Duration;

use cord_common::{ClientError, ClientResult, RestConfig, Token};
use cord_core::models::{RateLimitModel, RestErrorModel};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};

use super::options::RestRequestOptions;
use super::rate_limit::{seconds_to_duration, RateLimitHeaders, RateLimiter, MAX_RETRY_AFTER};
use super::route::FormattedRoute;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};

pub const AUDIT_LOG_REASON_HEADER: &str = "x-audit-log-reason";

const DEFAULT_USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/cord-rs/cord, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Sends requests through the rate limiter, retrying rate limits, server
/// errors and transport failures up to a bound
pub struct RestDispatcher {
    base_url: String,
    authorization: HeaderValue,
    transport: Arc<dyn HttpTransport>,
    limiter: RateLimiter,
    max_retries: u32,
    timeout: Duration,
    retry_backoff: Duration,
}

impl RestDispatcher {
    pub fn new(token: &Token, config: &RestConfig, transport: Arc<dyn HttpTransport>) -> ClientResult<Self> {
        let mut authorization = HeaderValue::from_str(&token.authorization())
            .map_err(|_| ClientError::Argument(cord_core::ArgumentError::Invalid {
                name: "token",
                message: "contains characters not allowed in a header".to_string(),
            }))?;
        authorization.set_sensitive(true);

        Ok(Self {
            base_url: config.base_url(),
            authorization,
            transport,
            limiter: RateLimiter::new(config.global_rate_limit),
            max_retries: config.max_retries,
            timeout: config.request_timeout(),
            retry_backoff: Duration::from_millis(500),
        })
    }

    /// Base delay of the exponential backoff for server and transport errors
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    fn build_request(
        &self,
        route: &FormattedRoute,
        body: Option<&[u8]>,
        options: Option<&RestRequestOptions>,
    ) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut request = HttpRequest {
            method: route.method().clone(),
            url: format!("{}{}", self.base_url, route.path_and_query()),
            headers,
            body: body.map(<[u8]>::to_vec),
            timeout: options
                .and_then(RestRequestOptions::timeout)
                .unwrap_or(self.timeout),
        };

        if let Some(options) = options {
            if let Some(reason) = options.encoded_reason() {
                request.set_header(AUDIT_LOG_REASON_HEADER, &reason);
            }
            for (name, value) in options.headers() {
                if !request.set_header(name, value) {
                    warn!(header = %name, "Skipping invalid request header");
                }
            }
            if let Some(hook) = options.hook() {
                hook(&mut request);
            }
        }
        request
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.retry_backoff.saturating_mul(1 << attempt.min(16));
        let jitter_ms = rand::thread_rng().gen_range(0..=base.as_millis() as u64 / 4);
        (base + Duration::from_millis(jitter_ms)).min(MAX_BACKOFF)
    }

    /// Send a request and return the successful response
    ///
    /// Non-success responses become [`ClientError::Http`]; exhausted rate
    /// limit retries become [`ClientError::RateLimited`].
    pub async fn execute(
        &self,
        route: &FormattedRoute,
        body: Option<Vec<u8>>,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<HttpResponse> {
        let max_retries = options
            .and_then(RestRequestOptions::max_retries)
            .unwrap_or(self.max_retries);
        let mut attempt = 0;

        loop {
            let mut ticket = self.limiter.acquire(route).await;
            let request = self.build_request(route, body.as_deref(), options);
            debug!(route = %route, attempt, "Sending request");

            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    drop(ticket);
                    let delay = self.backoff(attempt);
                    warn!(route = %route, error = %e, attempt, delay_ms = delay.as_millis() as u64, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let headers = RateLimitHeaders::from_headers(&response.headers);
            self.limiter.update(route, &mut ticket, &headers);
            debug!(route = %route, status = response.status, bucket = %ticket.key(), "Received response");

            if response.is_success() {
                return Ok(response);
            }

            if response.status == 429 {
                let limit = serde_json::from_slice::<RateLimitModel>(&response.body).ok();
                let retry_after = limit
                    .as_ref()
                    .and_then(|limit| seconds_to_duration(limit.retry_after))
                    .or(headers.retry_after)
                    .or(headers.reset_after)
                    .unwrap_or(Duration::from_secs(1));
                let global = headers.is_global() || limit.is_some_and(|limit| limit.global);

                // Waits at the ceiling are surfaced instead of slept through
                if attempt >= max_retries || retry_after >= MAX_RETRY_AFTER {
                    return Err(ClientError::RateLimited {
                        bucket: ticket.key().to_string(),
                        retry_after,
                        global,
                    });
                }

                warn!(route = %route, bucket = %ticket.key(), global, retry_after_ms = retry_after.as_millis() as u64, "Rate limited, retrying");
                if global {
                    self.limiter.pause_global(retry_after);
                    drop(ticket);
                } else {
                    // Keep the bucket locked so queued requests wait too
                    tokio::time::sleep(retry_after).await;
                    drop(ticket);
                }
                attempt += 1;
                continue;
            }

            drop(ticket);
            let error = http_error(&response);
            if response.status >= 500 && attempt < max_retries {
                let delay = self.backoff(attempt);
                warn!(route = %route, status = response.status, attempt, delay_ms = delay.as_millis() as u64, "Server error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }
            return Err(error);
        }
    }
}

impl std::fmt::Debug for RestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDispatcher")
            .field("base_url", &self.base_url)
            .field("limiter", &self.limiter)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Type a non-success response, reading the platform error body when present
pub(crate) fn http_error(response: &HttpResponse) -> ClientError {
    match serde_json::from_slice::<RestErrorModel>(&response.body) {
        Ok(model) => ClientError::Http {
            status: response.status,
            code: model.code,
            errors: model.field_messages(),
            message: model.message,
        },
        Err(_) => ClientError::Http {
            status: response.status,
            code: 0,
            message: String::from_utf8_lossy(&response.body).trim().to_string(),
            errors: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::super::rate_limit::{HEADER_BUCKET, HEADER_GLOBAL, HEADER_RETRY_AFTER};
    use super::super::route::routes;
    use super::*;

    /// Replays canned responses and records what was sent
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<ClientResult<HttpResponse>>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn push(&self, status: u16, headers: &[(&'static str, &str)], body: &str) {
            let mut map = HeaderMap::new();
            for (name, value) in headers {
                map.insert(*name, HeaderValue::from_str(value).unwrap());
            }
            self.responses.lock().push_back(Ok(HttpResponse {
                status,
                headers: map,
                body: body.as_bytes().to_vec(),
            }));
        }

        fn push_error(&self, error: ClientError) {
            self.responses.lock().push_back(Err(error));
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
            self.sent.lock().push(request);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::transport("script exhausted")))
        }
    }

    fn dispatcher(transport: Arc<ScriptedTransport>) -> RestDispatcher {
        let config = RestConfig {
            api_url: "http://mock".to_string(),
            global_rate_limit: 0,
            ..RestConfig::default()
        };
        RestDispatcher::new(&Token::bot("token").unwrap(), &config, transport)
            .unwrap()
            .with_retry_backoff(Duration::from_millis(10))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_sends_auth_and_url() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(200, &[], r#"{"id":"1"}"#);
        let dispatcher = dispatcher(transport.clone());

        let route = routes::GET_USER.format(&[&1_u64]);
        let response = dispatcher.execute(&route, None, None).await.unwrap();
        assert_eq!(response.status, 200);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://mock/v10/users/1");
        assert_eq!(sent[0].header("authorization"), Some("Bot token"));
        assert!(sent[0].header("content-type").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_429_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(
            429,
            &[(HEADER_RETRY_AFTER, "1")],
            r#"{"message":"You are being rate limited.","retry_after":0.5,"global":false}"#,
        );
        transport.push(200, &[], "{}");
        let dispatcher = dispatcher(transport.clone());

        let start = tokio::time::Instant::now();
        let route = routes::CREATE_MESSAGE.format(&[&1_u64]);
        dispatcher.execute(&route, Some(b"{}".to_vec()), None).await.unwrap();

        assert_eq!(transport.sent().len(), 2);
        // Body retry_after wins over the header
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_429_exhausted_is_rate_limited() {
        let transport = Arc::new(ScriptedTransport::default());
        for _ in 0..2 {
            transport.push(429, &[(HEADER_BUCKET, "b")], r#"{"message":"","retry_after":0.1,"global":false}"#);
        }
        let dispatcher = dispatcher(transport.clone());

        let route = routes::GET_CHANNEL.format(&[&7_u64]);
        let options = RestRequestOptions::new().with_max_retries(1);
        let err = dispatcher.execute(&route, None, Some(&options)).await.unwrap_err();

        match err {
            ClientError::RateLimited { bucket, global, .. } => {
                assert_eq!(bucket, "b:7");
                assert!(!global);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_retry_after_is_typed() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(
            429,
            &[(HEADER_RETRY_AFTER, "1e300")],
            r#"{"message":"","retry_after":1e300,"global":false}"#,
        );
        let dispatcher = dispatcher(transport.clone());

        let err = dispatcher
            .execute(&routes::GET_CHANNEL.format(&[&7_u64]), None, None)
            .await
            .unwrap_err();
        match err {
            ClientError::RateLimited { retry_after, .. } => assert_eq!(retry_after, MAX_RETRY_AFTER),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_429_pauses_limiter() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(429, &[(HEADER_GLOBAL, "true")], r#"{"message":"","retry_after":2,"global":true}"#);
        transport.push(200, &[], "{}");
        let dispatcher = dispatcher(transport.clone());

        let start = tokio::time::Instant::now();
        dispatcher
            .execute(&routes::GET_CURRENT_USER.format(&[]), None, None)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_server_errors_up_to_bound() {
        let transport = Arc::new(ScriptedTransport::default());
        for _ in 0..4 {
            transport.push(502, &[], "Bad Gateway");
        }
        let dispatcher = dispatcher(transport.clone());

        let err = dispatcher
            .execute(&routes::GET_GUILD.format(&[&1_u64]), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        // Default bound of 3 retries
        assert_eq!(transport.sent().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transport_errors() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_error(ClientError::transport("connection reset"));
        transport.push_error(ClientError::Timeout);
        transport.push(200, &[], "{}");
        let dispatcher = dispatcher(transport.clone());

        dispatcher
            .execute(&routes::GET_GUILD.format(&[&1_u64]), None, None)
            .await
            .unwrap();
        assert_eq!(transport.sent().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_not_retried() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(
            400,
            &[],
            r#"{"code":50035,"message":"Invalid Form Body","errors":{"content":{"_errors":[{"code":"BASE_TYPE_MAX_LENGTH","message":"Too long"}]}}}"#,
        );
        let dispatcher = dispatcher(transport.clone());

        let err = dispatcher
            .execute(&routes::CREATE_MESSAGE.format(&[&1_u64]), Some(b"{}".to_vec()), None)
            .await
            .unwrap_err();
        match err {
            ClientError::Http { status, code, message, errors } => {
                assert_eq!(status, 400);
                assert_eq!(code, 50035);
                assert_eq!(message, "Invalid Form Body");
                assert_eq!(errors, vec!["content: Too long".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_options_applied() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(204, &[], "");
        let dispatcher = dispatcher(transport.clone());

        let options = RestRequestOptions::new()
            .with_reason("cleanup spam")
            .with_header("X-Trace", "abc")
            .with_request_hook(|request| {
                request.set_header("X-Hooked", "yes");
            });
        dispatcher
            .execute(&routes::DELETE_MESSAGE.format(&[&1_u64, &2_u64]), None, Some(&options))
            .await
            .unwrap();

        let sent = &transport.sent()[0];
        assert_eq!(sent.header(AUDIT_LOG_REASON_HEADER), Some("cleanup%20spam"));
        assert_eq!(sent.header("x-trace"), Some("abc"));
        assert_eq!(sent.header("x-hooked"), Some("yes"));
    }

    #[test]
    fn test_http_error_plain_body() {
        let response = HttpResponse {
            status: 404,
            headers: HeaderMap::new(),
            body: b"not here".to_vec(),
        };
        let err = http_error(&response);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: not here (code 0)");
    }
}
