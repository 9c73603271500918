use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Keeps a fixed minimum gap between successive remote calls
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
        }
    }

    /// Wait until `delay` has passed since the previous call, then claim the slot
    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.ready_at() {
            sleep_until(ready_at).await;
        }
        self.last_request = Some(Instant::now());
    }

    fn ready_at(&self) -> Option<Instant> {
        self.last_request.map(|last| last + self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let mut limiter = RateLimiter::new(5_000);
        let started = Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn test_successive_requests_are_spaced() {
        let mut limiter = RateLimiter::new(60);
        let started = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(120));
    }
}
