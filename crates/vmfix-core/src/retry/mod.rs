//! Fixed-delay retry executor.
//!
//! Bridges eventually consistent reads with synchronous test assertions: an
//! operation is re-run, with a fixed pause in between, until a predicate
//! accepts its result, the retry budget is spent, a non-retryable error
//! occurs, or a [`CancelToken`] fires. Blocking and single-threaded; one
//! attempt runs at a time.

mod cancel;
mod error;
mod hook;
mod policy;
mod run;

pub use cancel::CancelToken;
pub use error::RetryError;
pub use hook::{LogHook, NoopHook, RetryHook};
pub use policy::{RetryConfig, RetryDecision, RetryPolicy};
pub use run::RetryExecutor;
