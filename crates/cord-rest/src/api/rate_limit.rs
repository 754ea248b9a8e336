//! Rate limiting - per-bucket state learned from response headers plus a
//! process-wide global quota
//!
//! A request holds its bucket's lock from acquisition until its response
//! headers are applied, so at most one request per bucket is in flight.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::header::HeaderMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::route::FormattedRoute;

// ============================================================================
// Headers
// ============================================================================

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET_AFTER: &str = "x-ratelimit-reset-after";
pub const HEADER_BUCKET: &str = "x-ratelimit-bucket";
pub const HEADER_GLOBAL: &str = "x-ratelimit-global";
pub const HEADER_SCOPE: &str = "x-ratelimit-scope";
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Rate limit information carried by a response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitHeaders {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset_after: Option<Duration>,
    pub bucket: Option<String>,
    pub global: bool,
    /// `user`, `global` or `shared`
    pub scope: Option<String>,
    pub retry_after: Option<Duration>,
}

impl RateLimitHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
        Self {
            limit: get(HEADER_LIMIT).and_then(|value| value.parse().ok()),
            remaining: get(HEADER_REMAINING).and_then(|value| value.parse().ok()),
            reset_after: get(HEADER_RESET_AFTER).and_then(parse_seconds),
            bucket: get(HEADER_BUCKET).map(str::to_string),
            global: get(HEADER_GLOBAL).is_some_and(|value| value.eq_ignore_ascii_case("true")),
            scope: get(HEADER_SCOPE).map(str::to_string),
            retry_after: get(HEADER_RETRY_AFTER).and_then(parse_seconds),
        }
    }

    pub fn is_global(&self) -> bool {
        self.global || self.scope.as_deref() == Some("global")
    }
}

/// Longest wait taken from a server-supplied reset or retry value
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Parse fractional seconds, rejecting negative and non-finite values
pub(crate) fn parse_seconds(value: &str) -> Option<Duration> {
    seconds_to_duration(value.trim().parse().ok()?)
}

/// Convert server-supplied seconds, capped at [`MAX_RETRY_AFTER`]
pub(crate) fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(seconds).map_or(MAX_RETRY_AFTER, |d| d.min(MAX_RETRY_AFTER)))
}

// ============================================================================
// Buckets
// ============================================================================

#[derive(Debug, Default)]
pub struct BucketState {
    limit: Option<u32>,
    remaining: Option<u32>,
    reset_at: Option<Instant>,
}

impl BucketState {
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Time left until the bucket refills, when it is empty
    fn exhausted_for(&self, now: Instant) -> Option<Duration> {
        match (self.remaining, self.reset_at) {
            (Some(0), Some(reset_at)) if reset_at > now => Some(reset_at - now),
            _ => None,
        }
    }

    fn apply(&mut self, headers: &RateLimitHeaders, now: Instant) {
        if let Some(limit) = headers.limit {
            self.limit = Some(limit);
        }
        if let Some(remaining) = headers.remaining {
            self.remaining = Some(remaining);
        }
        if let Some(reset_after) = headers.reset_after {
            self.reset_at = now.checked_add(reset_after);
        }
    }

    fn refill(&mut self) {
        self.remaining = self.limit;
        self.reset_at = None;
    }
}

type SharedBucket = Arc<Mutex<BucketState>>;

/// Exclusive access to a bucket for the duration of one request
#[derive(Debug)]
pub struct BucketTicket {
    key: String,
    bucket: SharedBucket,
    state: OwnedMutexGuard<BucketState>,
}

impl BucketTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &BucketState {
        &self.state
    }
}

// ============================================================================
// Rate Limiter
// ============================================================================

/// Bucket registry shared by every request of a client
pub struct RateLimiter {
    buckets: DashMap<String, SharedBucket>,
    /// Route key -> bucket hash reported by the server
    hashes: DashMap<String, String>,
    global_until: parking_lot::Mutex<Option<Instant>>,
    global: Option<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `global_per_second` requests per second
    /// across all buckets; `0` disables the global quota
    pub fn new(global_per_second: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            hashes: DashMap::new(),
            global_until: parking_lot::Mutex::new(None),
            global: NonZeroU32::new(global_per_second)
                .map(|rate| governor::RateLimiter::direct(Quota::per_second(rate))),
        }
    }

    /// Bucket hash learned for the route, if any
    pub fn learned_hash(&self, route: &FormattedRoute) -> Option<String> {
        self.hashes
            .get(&route.route_key())
            .map(|hash| hash.value().clone())
    }

    /// Key of the bucket the route currently maps to
    pub fn bucket_key(&self, route: &FormattedRoute) -> String {
        let hash = self
            .learned_hash(route)
            .unwrap_or_else(|| route.route_key());
        route.bucket_key(&hash)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Wait for the global quota and the route's bucket
    pub async fn acquire(&self, route: &FormattedRoute) -> BucketTicket {
        self.wait_global().await;

        let key = self.bucket_key(route);
        let bucket = self.buckets.entry(key.clone()).or_default().clone();
        let mut state = bucket.clone().lock_owned().await;

        if let Some(wait) = state.exhausted_for(Instant::now()) {
            debug!(bucket = %key, wait_ms = wait.as_millis() as u64, "Bucket exhausted, waiting for reset");
            tokio::time::sleep(wait).await;
            state.refill();
        }

        BucketTicket { key, bucket, state }
    }

    async fn wait_global(&self) {
        loop {
            let until = *self.global_until.lock();
            match until {
                Some(until) if until > Instant::now() => {
                    debug!(wait_ms = (until - Instant::now()).as_millis() as u64, "Waiting for global rate limit");
                    tokio::time::sleep_until(until).await;
                }
                _ => break,
            }
        }
        if let Some(global) = &self.global {
            global.until_ready().await;
        }
    }

    /// Apply response headers to the ticket's bucket
    ///
    /// A newly learned hash registers the bucket under its hashed key so
    /// later requests on the route share it.
    pub fn update(&self, route: &FormattedRoute, ticket: &mut BucketTicket, headers: &RateLimitHeaders) {
        if let Some(hash) = &headers.bucket {
            let route_key = route.route_key();
            let known = self
                .hashes
                .get(&route_key)
                .is_some_and(|known| known.value() == hash);
            if !known {
                self.hashes.insert(route_key, hash.clone());
                let key = route.bucket_key(hash);
                if key != ticket.key {
                    debug!(route = %route.route(), bucket = %key, "Learned bucket hash");
                    self.buckets
                        .entry(key)
                        .or_insert_with(|| ticket.bucket.clone());
                }
            }
        }
        ticket.state.apply(headers, Instant::now());
    }

    /// Pause every bucket until `retry_after` has elapsed
    pub fn pause_global(&self, retry_after: Duration) {
        let retry_after = retry_after.min(MAX_RETRY_AFTER);
        let Some(until) = Instant::now().checked_add(retry_after) else {
            return;
        };
        let mut global_until = self.global_until.lock();
        if global_until.map_or(true, |current| current < until) {
            warn!(retry_after_ms = retry_after.as_millis() as u64, "Global rate limit hit");
            *global_until = Some(until);
        }
    }

    pub fn is_globally_paused(&self) -> bool {
        self.global_until
            .lock()
            .is_some_and(|until| until > Instant::now())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(50)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("buckets", &self.buckets.len())
            .field("hashes", &self.hashes.len())
            .field("global_until", &*self.global_until.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::route::routes;
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> RateLimitHeaders {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        RateLimitHeaders::from_headers(&map)
    }

    #[test]
    fn test_parse_headers() {
        let parsed = headers(&[
            (HEADER_LIMIT, "5"),
            (HEADER_REMAINING, "4"),
            (HEADER_RESET_AFTER, "1.5"),
            (HEADER_BUCKET, "abcd"),
            (HEADER_SCOPE, "user"),
        ]);
        assert_eq!(parsed.limit, Some(5));
        assert_eq!(parsed.remaining, Some(4));
        assert_eq!(parsed.reset_after, Some(Duration::from_millis(1500)));
        assert_eq!(parsed.bucket.as_deref(), Some("abcd"));
        assert!(!parsed.is_global());
    }

    #[test]
    fn test_parse_global() {
        assert!(headers(&[(HEADER_GLOBAL, "true")]).is_global());
        assert!(headers(&[(HEADER_SCOPE, "global")]).is_global());
        assert_eq!(
            headers(&[(HEADER_RETRY_AFTER, "2")]).retry_after,
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_parse_seconds_rejects_garbage() {
        assert_eq!(parse_seconds("-1"), None);
        assert_eq!(parse_seconds("NaN"), None);
        assert_eq!(parse_seconds("soon"), None);
        assert_eq!(parse_seconds("0.25"), Some(Duration::from_millis(250)));
        assert_eq!(parse_seconds("inf"), None);
    }

    #[test]
    fn test_huge_header_values_are_capped() {
        let parsed = headers(&[(HEADER_RETRY_AFTER, "1e300"), (HEADER_RESET_AFTER, "1e300")]);
        assert_eq!(parsed.retry_after, Some(MAX_RETRY_AFTER));
        assert_eq!(parsed.reset_after, Some(MAX_RETRY_AFTER));
        assert_eq!(seconds_to_duration(f64::MAX), Some(MAX_RETRY_AFTER));
        assert_eq!(seconds_to_duration(2.0), Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_pause_global_with_huge_duration() {
        let limiter = RateLimiter::new(0);
        limiter.pause_global(Duration::MAX);
        assert!(limiter.is_globally_paused());
    }

    #[tokio::test]
    async fn test_template_is_hash_until_learned() {
        let limiter = RateLimiter::new(0);
        let route = routes::CREATE_MESSAGE.format(&[&1_u64]);
        assert_eq!(limiter.bucket_key(&route), "POST /channels/{channel.id}/messages:1");

        let mut ticket = limiter.acquire(&route).await;
        limiter.update(&route, &mut ticket, &headers(&[(HEADER_BUCKET, "h1")]));
        drop(ticket);

        assert_eq!(limiter.learned_hash(&route).as_deref(), Some("h1"));
        assert_eq!(limiter.bucket_key(&route), "h1:1");
        // Other channels on the same route use the learned hash too
        let other = routes::CREATE_MESSAGE.format(&[&2_u64]);
        assert_eq!(limiter.bucket_key(&other), "h1:2");
    }

    #[tokio::test]
    async fn test_learned_bucket_keeps_state() {
        let limiter = RateLimiter::new(0);
        let route = routes::GET_CHANNEL.format(&[&1_u64]);

        let mut ticket = limiter.acquire(&route).await;
        limiter.update(
            &route,
            &mut ticket,
            &headers(&[(HEADER_BUCKET, "h"), (HEADER_LIMIT, "5"), (HEADER_REMAINING, "3")]),
        );
        drop(ticket);

        let ticket = limiter.acquire(&route).await;
        assert_eq!(ticket.key(), "h:1");
        assert_eq!(ticket.state().limit(), Some(5));
        assert_eq!(ticket.state().remaining(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_bucket_waits_for_reset() {
        let limiter = RateLimiter::new(0);
        let route = routes::GET_CHANNEL.format(&[&1_u64]);

        let mut ticket = limiter.acquire(&route).await;
        limiter.update(
            &route,
            &mut ticket,
            &headers(&[(HEADER_LIMIT, "1"), (HEADER_REMAINING, "0"), (HEADER_RESET_AFTER, "2")]),
        );
        drop(ticket);

        let start = Instant::now();
        let ticket = limiter.acquire(&route).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(ticket.state().remaining(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_request_in_flight_per_bucket() {
        let limiter = RateLimiter::new(0);
        let route = routes::GET_CHANNEL.format(&[&1_u64]);
        let other = routes::GET_CHANNEL.format(&[&2_u64]);

        let _held = limiter.acquire(&route).await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), limiter.acquire(&route)).await;
        assert!(blocked.is_err());

        // A different major parameter is a different bucket
        let free = tokio::time::timeout(Duration::from_millis(50), limiter.acquire(&other)).await;
        assert!(free.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_pause_blocks_all_buckets() {
        let limiter = RateLimiter::new(0);
        limiter.pause_global(Duration::from_secs(1));
        assert!(limiter.is_globally_paused());

        let start = Instant::now();
        let _ticket = limiter.acquire(&routes::GET_USER.format(&[&1_u64])).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(!limiter.is_globally_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorter_global_pause_does_not_shorten() {
        let limiter = RateLimiter::new(0);
        limiter.pause_global(Duration::from_secs(10));
        limiter.pause_global(Duration::from_millis(1));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(limiter.is_globally_paused());
    }
}
