//! Heartbeat bookkeeping

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

/// Tracks beats sent and ACKs received on one connection
///
/// A beat that goes out while the previous one is still unacknowledged
/// means the connection is a zombie and must be replaced.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Duration,
    next_beat: Instant,
    last_sent: Option<Instant>,
    acked: bool,
    latency: Option<Duration>,
}

/// Upper bound on a server-announced interval
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

impl Heartbeat {
    /// Schedule the first beat after `interval * jitter`, jitter in `[0, 1)`
    ///
    /// The interval is clamped to [`MAX_INTERVAL`].
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.min(MAX_INTERVAL);
        let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
        Self::with_first_beat(interval, now + interval.mul_f64(jitter))
    }

    pub fn with_first_beat(interval: Duration, first_beat: Instant) -> Self {
        Self {
            interval: interval.min(MAX_INTERVAL),
            next_beat: first_beat,
            last_sent: None,
            acked: true,
            latency: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_beat(&self) -> Instant {
        self.next_beat
    }

    /// No ACK arrived for the last beat
    pub fn is_zombie(&self) -> bool {
        self.last_sent.is_some() && !self.acked
    }

    pub fn is_acked(&self) -> bool {
        self.acked
    }

    pub fn record_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
        self.acked = false;
        self.next_beat = now + self.interval;
    }

    pub fn record_ack(&mut self, now: Instant) {
        self.acked = true;
        self.latency = self.last_sent.map(|sent| now.saturating_duration_since(sent));
    }

    /// Round trip of the last acknowledged beat
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }
}
