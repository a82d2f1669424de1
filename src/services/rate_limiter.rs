use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

/// Courtesy delay between successive calls to one external service.
///
/// Jobs call services one at a time, so this only spaces calls out; it does
/// not bound concurrency.
#[derive(Clone)]
pub struct RateLimiter {
    last_request: Arc<Mutex<Option<Instant>>>,
    min_delay: Duration,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            last_request: Arc::new(Mutex::new(None)),
            min_delay,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Waits until `min_delay` has passed since the previous call, then
    /// records this call. The first call never waits.
    pub async fn acquire(&self) {
        let wait_time = {
            let last = self.last_request.lock();
            last.and_then(|at| self.min_delay.checked_sub(at.elapsed()))
        }; // Lock is dropped here

        if let Some(delay) = wait_time {
            sleep(delay).await;
        }

        *self.last_request.lock() = Some(Instant::now());
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}
