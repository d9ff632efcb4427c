//! Request throttling for metadata services.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

/// Per-service rate limiter.
///
/// Limits throughput to a configurable number of requests per second by
/// combining a single-permit [`Semaphore`] with a fixed sleep interval.
/// Throttling only; failed requests are never retried here.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` that allows at most
    /// `requests_per_second` requests per second. Zero disables throttling.
    pub fn new(requests_per_second: u32) -> Self {
        let interval = if requests_per_second == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(1000 / u64::from(requests_per_second))
        };
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval,
        }
    }

    /// Minimum spacing between two requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request slot is available, then holds the slot for
    /// the configured interval.
    pub async fn acquire(&self) {
        // The semaphore is never closed, so acquiring cannot fail.
        let _permit = self.semaphore.acquire().await.ok();
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
    }
}
