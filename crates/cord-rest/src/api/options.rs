//! Per-request options

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::transport::HttpRequest;

/// Callback run on the outgoing request right before it is sent
pub type RequestHook = Arc<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Options that adjust how a single request is sent
///
/// Unset values fall back to the client's defaults.
#[derive(Clone, Default)]
pub struct RestRequestOptions {
    reason: Option<String>,
    headers: Vec<(String, String)>,
    max_retries: Option<u32>,
    timeout: Option<Duration>,
    hook: Option<RequestHook>,
}

impl RestRequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reason shown in the guild's audit log
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_request_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HttpRequest) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn hook(&self) -> Option<&RequestHook> {
        self.hook.as_ref()
    }

    /// `X-Audit-Log-Reason` value: percent-encoded, spaces as `%20`
    pub fn encoded_reason(&self) -> Option<String> {
        self.reason.as_deref().map(|reason| {
            url::form_urlencoded::byte_serialize(reason.as_bytes())
                .collect::<String>()
                .replace('+', "%20")
        })
    }
}

impl fmt::Debug for RestRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRequestOptions")
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
