//! Callbacks run after each rejected attempt that will be retried.

use std::fmt;

/// Observer invoked once per rejected attempt, right before the pause that
/// precedes the next attempt. It never runs for the accepted attempt nor for
/// the terminal rejection, and it cannot influence the retry decision.
///
/// `attempt` is 0-based; `outcome` is what the attempt produced.
pub trait RetryHook<T, E> {
    fn on_retry(&mut self, attempt: u32, outcome: &Result<T, E>);
}

impl<T, E, F> RetryHook<T, E> for F
where
    F: FnMut(u32, &Result<T, E>),
{
    fn on_retry(&mut self, attempt: u32, outcome: &Result<T, E>) {
        self(attempt, outcome)
    }
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl<T, E> RetryHook<T, E> for NoopHook {
    fn on_retry(&mut self, _attempt: u32, _outcome: &Result<T, E>) {}
}

/// Default hook: one `tracing` warning per rejected attempt.
/// Emits events only; subscriber setup belongs to the hosting binary.
#[derive(Debug, Clone, Default)]
pub struct LogHook {
    operation: String,
}

impl LogHook {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Display> RetryHook<T, E> for LogHook {
    fn on_retry(&mut self, attempt: u32, outcome: &Result<T, E>) {
        match outcome {
            Ok(value) => tracing::warn!(
                operation = %self.operation,
                attempt,
                "retry {}: result not accepted: {:?}",
                attempt,
                value
            ),
            Err(e) => tracing::warn!(
                operation = %self.operation,
                attempt,
                "retry {}: {}",
                attempt,
                e
            ),
        }
    }
}
