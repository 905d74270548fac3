//! Wall clock and waiting

use crate::ratelimit::Delay;
use crate::types::Epoch;
use async_trait::async_trait;

/// Source of the current time and of waits
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds
    fn now(&self) -> Epoch;

    /// Wait for `delay`
    async fn sleep(&self, delay: Delay);
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Epoch {
        chrono::Utc::now().timestamp()
    }

    async fn sleep(&self, delay: Delay) {
        tokio::time::sleep(delay.as_duration()).await;
    }
}
