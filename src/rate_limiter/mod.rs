use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Spaces out requests to the tournament host
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(interval_ms),
            last_request: None,
            request_count: 0,
        }
    }

    /// Waits out whatever is left of the interval since the previous request
    pub async fn wait(&mut self) {
        if let Some(remaining) = self.remaining() {
            sleep(remaining).await;
        }
        self.last_request = Some(Instant::now());
        self.request_count += 1;
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }

    fn remaining(&self) -> Option<Duration> {
        let elapsed = self.last_request?.elapsed();
        self.min_interval.checked_sub(elapsed).filter(|d| !d.is_zero())
    }
}
