//! Async sleeping used for retry backoff and batch pacing

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Suspends the current task for a duration
///
/// Backoff and pacing go through this trait so each orchestration call only
/// ever suspends its own task, and so tests can observe the delays.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Records requested pauses without sleeping
#[derive(Debug, Default)]
pub struct RecordingPause {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pause requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}
