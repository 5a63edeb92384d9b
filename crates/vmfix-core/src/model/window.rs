//! Time windows for generated samples and range queries.

use chrono::{DateTime, Duration, Utc};

use super::error::ModelError;

/// Half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window of length `span` ending now. "Now" is read on every call.
    ///
    /// A negative span is an inverted window; a span reaching past the
    /// representable range is rejected instead of overflowing.
    pub fn last(span: Duration) -> Result<Self, ModelError> {
        let end = Utc::now();
        let start = end
            .checked_sub_signed(span)
            .ok_or(ModelError::SpanOutOfRange(span))?;
        Self::new(start, end)
    }

    /// The last hour, the default window of the fixtures.
    pub fn last_hour() -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::hours(1),
            end,
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}
