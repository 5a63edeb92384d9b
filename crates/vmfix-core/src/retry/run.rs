//! Retry loop: run an operation until it is accepted or the policy says stop.

use super::cancel::{pause, CancelToken};
use super::error::RetryError;
use super::hook::{LogHook, RetryHook};
use super::policy::{RetryDecision, RetryPolicy};

/// Runs one operation repeatedly under a [`RetryPolicy`].
///
/// Two strategies are offered and they differ on purpose:
/// - [`execute`](Self::execute) retries on any error *and* on results the
///   `accept` predicate rejects, and reports exhaustion with its own error;
/// - [`execute_on_error`](Self::execute_on_error) returns the first `Ok`
///   untested, retries only errors matched by `retryable`, and hands back the
///   operation's last error unchanged.
///
/// The executor is built per call site and holds no state between calls.
pub struct RetryExecutor<H = LogHook> {
    policy: RetryPolicy,
    operation: String,
    hook: H,
    cancel: Option<CancelToken>,
}

impl RetryExecutor<LogHook> {
    /// Executor with the default logging hook. `operation` names the call in
    /// logs and in [`RetryError::Exhausted`].
    pub fn new(policy: RetryPolicy, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self {
            policy,
            hook: LogHook::new(operation.clone()),
            operation,
            cancel: None,
        }
    }
}

impl<H> RetryExecutor<H> {
    /// Replace the hook run after each rejected attempt.
    pub fn with_hook<H2>(self, hook: H2) -> RetryExecutor<H2> {
        RetryExecutor {
            policy: self.policy,
            operation: self.operation,
            hook,
            cancel: self.cancel,
        }
    }

    /// Abort with [`RetryError::Cancelled`] once `token` is set.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Retry on error or on a result `accept` rejects.
    ///
    /// Returns the first accepted value unchanged. After `max_retries + 1`
    /// rejected attempts returns [`RetryError::Exhausted`], whether the last
    /// rejection was an error or a value.
    pub fn execute<T, E, F, P>(&mut self, mut op: F, mut accept: P) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&T) -> bool,
        H: RetryHook<T, E>,
    {
        let mut attempt = 0u32;
        loop {
            self.check_cancel::<E>(attempt)?;
            let outcome = op();
            if let Ok(value) = &outcome {
                if accept(value) {
                    if attempt > 0 {
                        tracing::debug!(operation = %self.operation, attempt, "accepted after retries");
                    }
                    return outcome.map_err(RetryError::Operation);
                }
            }
            // A rejection caused by cancellation inside `op` is not retried.
            self.check_cancel::<E>(attempt + 1)?;
            match self.policy.decide(attempt) {
                RetryDecision::Stop => {
                    tracing::debug!(operation = %self.operation, attempt, "retries exhausted");
                    return Err(RetryError::Exhausted {
                        operation: self.operation.clone(),
                        retries: self.policy.max_retries,
                    });
                }
                RetryDecision::RetryAfter(delay) => {
                    self.hook.on_retry(attempt, &outcome);
                    self.sleep::<E>(delay, attempt)?;
                    attempt += 1;
                }
            }
        }
    }

    /// Retry only errors `retryable` matches; never inspect successful results.
    ///
    /// A non-matching error, or any error once retries are used up, is
    /// returned as [`RetryError::Operation`] holding the original error.
    pub fn execute_on_error<T, E, F, P>(
        &mut self,
        mut op: F,
        mut retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&E) -> bool,
        H: RetryHook<T, E>,
    {
        let mut attempt = 0u32;
        loop {
            self.check_cancel::<E>(attempt)?;
            let outcome = op();
            let retry = match &outcome {
                Ok(_) => false,
                Err(e) => retryable(e),
            };
            if !retry {
                return outcome.map_err(RetryError::Operation);
            }
            self.check_cancel::<E>(attempt + 1)?;
            match self.policy.decide(attempt) {
                RetryDecision::Stop => return outcome.map_err(RetryError::Operation),
                RetryDecision::RetryAfter(delay) => {
                    self.hook.on_retry(attempt, &outcome);
                    self.sleep::<E>(delay, attempt)?;
                    attempt += 1;
                }
            }
        }
    }

    fn check_cancel<E>(&self, attempt: u32) -> Result<(), RetryError<E>> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(self.cancelled(attempt)),
            _ => Ok(()),
        }
    }

    fn sleep<E>(&self, delay: std::time::Duration, attempt: u32) -> Result<(), RetryError<E>> {
        if pause(delay, self.cancel.as_ref()) {
            Ok(())
        } else {
            // The attempt that led into this pause has completed.
            Err(self.cancelled(attempt + 1))
        }
    }

    fn cancelled<E>(&self, attempts: u32) -> RetryError<E> {
        tracing::debug!(operation = %self.operation, attempts, "retry loop cancelled");
        RetryError::Cancelled {
            operation: self.operation.clone(),
            attempts,
        }
    }
}
