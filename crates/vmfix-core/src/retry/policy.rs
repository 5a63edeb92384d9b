use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision returned by the retry policy after a rejected attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retries are used up; the rejection is terminal.
    Stop,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-delay retry policy.
///
/// `max_retries` counts retries after the first attempt, so an operation runs
/// at most `max_retries + 1` times. The delay is the same between every pair of
/// attempts; there is no growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Policy with no retries: exactly one attempt.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Polling budget suited to eventual-consistency windows of the metrics
    /// backend: 20 retries two seconds apart.
    pub fn polling() -> Self {
        Self::new(20, Duration::from_secs(2))
    }

    /// Upper bound of time spent sleeping across one execute call.
    pub fn max_total_delay(&self) -> Duration {
        self.delay.saturating_mul(self.max_retries)
    }

    /// Decide what follows a rejected attempt.
    ///
    /// `attempt` is 0-based: the number of retries already consumed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_retries {
            RetryDecision::Stop
        } else {
            RetryDecision::RetryAfter(self.delay)
        }
    }
}

/// Retry parameters as they appear in `config.toml` (`[poll]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts in seconds (e.g. 0.5 = 500ms).
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::polling();
        Self {
            max_retries: p.max_retries,
            delay_secs: p.delay.as_secs_f64(),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        // Negative or NaN delays collapse to zero; too large ones saturate.
        let delay = if cfg.delay_secs.is_nan() || cfg.delay_secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(cfg.delay_secs).unwrap_or(Duration::MAX)
        };
        RetryPolicy::new(cfg.max_retries, delay)
    }
}
