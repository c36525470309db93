use std::time::Duration;

use crate::config::ReconnectConfig;

/// Reconnect delay schedule.
///
/// `delay(attempt) = min(base_delay * 2^attempt, max_delay)`. There is no
/// attempt limit: the relay retries forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryStrategy {
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryStrategy {
    /// Create a new retry strategy
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &ReconnectConfig) -> Self {
        Self::new(
            Duration::from_secs(config.base_delay_secs),
            Duration::from_secs(config.max_delay_secs),
        )
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Calculate the delay after the `attempt`-th consecutive failure
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delays for a range of attempts, for logging and tests
    pub fn schedule(&self, attempts: std::ops::RangeInclusive<u32>) -> Vec<Duration> {
        attempts.map(|attempt| self.delay_for(attempt)).collect()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(300))
    }
}

/// Consecutive-failure counter owned by the supervisor loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempt_count: u32,
}

impl RetryState {
    /// Count a failure and return the new attempt number (starting at 1).
    pub fn record_failure(&mut self) -> u32 {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.attempt_count
    }

    pub fn reset(&mut self) {
        self.attempt_count = 0;
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }
}
