use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of milliseconds a timer may wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self { min_ms: ms, max_ms: ms }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }
}

/// Source of timer delays. Swapped for a deterministic one in tests.
pub trait Jitter: Send + Sync {
    fn pick(&self, range: DelayRange) -> Duration;
}

/// Uniformly random delay inside the range
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn pick(&self, range: DelayRange) -> Duration {
        if range.min_ms >= range.max_ms {
            return range.min();
        }
        Duration::from_millis(rand::rng().random_range(range.min_ms..=range.max_ms))
    }
}

/// Always the lower bound of the range
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerBound;

impl Jitter for LowerBound {
    fn pick(&self, range: DelayRange) -> Duration {
        range.min()
    }
}

/// Never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Jitter for NoDelay {
    fn pick(&self, _range: DelayRange) -> Duration {
        Duration::ZERO
    }
}
