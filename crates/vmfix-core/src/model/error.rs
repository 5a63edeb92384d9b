//! Validation errors for fixture data.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("metric name must not be empty")]
    EmptyName,
    #[error("{values} values but {timestamps} timestamps")]
    LengthMismatch { values: usize, timestamps: usize },
    #[error("window start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("window span {0} is out of range")]
    SpanOutOfRange(Duration),
    #[error("step must be positive, got {0}s")]
    InvalidStep(i64),
    #[error("random range is empty: min {min} > max {max}")]
    InvalidRange { min: i64, max: i64 },
}
