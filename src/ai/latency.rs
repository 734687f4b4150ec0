//! Response latency simulation.
//!
//! Each call kind waits a random delay drawn from its configured range before
//! answering. The wait is a `tokio::time::sleep`, so concurrent callers are
//! never blocked by one another.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive delay range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const ZERO: DelayRange = DelayRange::new(0, 0);

    /// Draw a delay. A reversed range is treated as its lower bound.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let ms = if self.max_ms <= self.min_ms {
            self.min_ms
        } else {
            rng.gen_range(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Suggestion,
    OpeningLine,
    PracticeResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_suggestion")]
    pub suggestion: DelayRange,
    #[serde(default = "default_opening_line")]
    pub opening_line: DelayRange,
    #[serde(default = "default_practice_response")]
    pub practice_response: DelayRange,
}

fn default_suggestion() -> DelayRange {
    DelayRange::new(200, 600)
}

fn default_opening_line() -> DelayRange {
    DelayRange::new(100, 300)
}

fn default_practice_response() -> DelayRange {
    DelayRange::new(300, 700)
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            suggestion: default_suggestion(),
            opening_line: default_opening_line(),
            practice_response: default_practice_response(),
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn instant() -> Self {
        Self {
            suggestion: DelayRange::ZERO,
            opening_line: DelayRange::ZERO,
            practice_response: DelayRange::ZERO,
        }
    }

    pub fn range(&self, kind: CallKind) -> DelayRange {
        match kind {
            CallKind::Suggestion => self.suggestion,
            CallKind::OpeningLine => self.opening_line,
            CallKind::PracticeResponse => self.practice_response,
        }
    }
}

/// Suspend the current task for `delay`. Zero delays return immediately.
pub async fn simulate(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    tracing::debug!(delay_ms = delay.as_millis() as u64, "simulating processing latency");
    tokio::time::sleep(delay).await;
}
