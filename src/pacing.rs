use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use crate::config::DelayConfig;

/// Timing policy for the batch loop: produces the wait durations and
/// performs the actual suspension. All suspension points in a run go
/// through one of these.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Randomized wait inserted between consecutive identities.
    fn between_identities(&self) -> Duration;

    /// Fixed wait before re-issuing a request after a retryable rejection.
    fn retry_cooldown(&self) -> Duration;

    /// Fixed wait observed after a terminal error.
    fn error_cooldown(&self) -> Duration;

    async fn pause(&self, duration: Duration);
}

pub struct TokioPacer {
    delay: DelayConfig,
}

impl TokioPacer {
    pub fn new(delay: DelayConfig) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    fn between_identities(&self) -> Duration {
        let secs = rand::rng().random_range(self.delay.min_s..=self.delay.max_s);
        Duration::from_secs(secs)
    }

    fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.delay.retry_s)
    }

    fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.delay.on_error_s)
    }

    async fn pause(&self, duration: Duration) {
        sleep(duration).await;
    }
}
