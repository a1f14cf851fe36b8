//! Rate limiting for API requests

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval throttle applied before each outgoing request
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing `min_interval_ms` between requests
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed
    pub async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        let now = Instant::now();

        if let Some(prev) = *last {
            let elapsed = now.duration_since(prev);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Injected inter-page delay for long-running pagination loops
///
/// Kept as a trait so tests can run the paginator without wall-clock
/// sleeps.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Pause before the next page request
    async fn pause(&self);
}

/// Production pacer: a fixed `tokio::time::sleep` between pages
pub struct IntervalPacer {
    interval: Duration,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// Pacer that never waits, for tests
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}
