/*
[INPUT]:  Step and notice delays from scripts and RunnerOptions
[OUTPUT]: Awaitable pauses - the only suspension points of a run
[POS]:    Scheduling primitive used by TaskRunner
[UPDATE]: When adding new pacing strategies
*/

use std::time::Duration;

use async_trait::async_trait;

/// Suspend-then-resume effect awaited before every paced append.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer, scaling every delay.
///
/// A scale of `1.0` plays lessons at their authored pace, `0.0` only yields.
#[derive(Debug, Clone, Copy)]
pub struct TokioPacer {
    scale: f64,
}

impl TokioPacer {
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.scale).unwrap_or(Duration::MAX)
    }
}

impl Default for TokioPacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        let scaled = self.scaled(delay);
        if scaled.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(scaled).await;
        }
    }
}

/// Never waits; still yields so other tasks observe each step.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _delay: Duration) {
        tokio::task::yield_now().await;
    }
}
