//! Terminal errors of a retried operation.

use std::fmt;

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Error raised by the operation itself, passed through unchanged.
    /// Produced by [`RetryExecutor::execute_on_error`](super::RetryExecutor::execute_on_error)
    /// when the error is not retryable or the retries are used up.
    Operation(E),
    /// Every attempt was rejected (error or unaccepted result).
    /// Produced by [`RetryExecutor::execute`](super::RetryExecutor::execute).
    Exhausted { operation: String, retries: u32 },
    /// The cancellation token was set before an attempt or during a pause.
    Cancelled { operation: String, attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// The operation's own error, if this is a pass-through.
    pub fn into_operation(self) -> Option<E> {
        match self {
            RetryError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Operation(e) => write!(f, "{}", e),
            RetryError::Exhausted { operation, retries } => {
                write!(f, "operation '{}' failed after {} retries", operation, retries)
            }
            RetryError::Cancelled { operation, attempts } => {
                write!(
                    f,
                    "operation '{}' cancelled after {} attempt(s)",
                    operation, attempts
                )
            }
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            // Pass-through keeps the operation's own chain.
            RetryError::Operation(e) => e.source(),
            RetryError::Exhausted { .. } | RetryError::Cancelled { .. } => None,
        }
    }
}
