//! Trait abstractions for runtime timing
//!
//! These traits enable testing the executor without real delays.

use async_trait::async_trait;
use std::time::Duration;

/// Source of the simulated "thinking" delay before a pipeline appears
///
/// The executor races every wait against a cancellation token, so
/// implementations only need to resolve once the time is up.
#[async_trait]
pub trait ThinkingTimer: Send + Sync {
    async fn wait(&self);
}

/// Production timer: sleeps for a fixed duration
#[derive(Debug, Clone, Copy)]
pub struct DelayTimer {
    delay: Duration,
}

impl DelayTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ThinkingTimer for DelayTimer {
    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
