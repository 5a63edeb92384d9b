pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod retry;

pub use client::{ClientError, ImportRequest, MetricsClient};
pub use retry::{CancelToken, RetryError, RetryExecutor, RetryPolicy};
