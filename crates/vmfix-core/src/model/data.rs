//! Import payload: one series with its samples.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ModelError;
use super::labels::MetricLabels;

/// Sample value as sent on the wire: a bare JSON integer or float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Int(i64),
    Float(f64),
}

impl SampleValue {
    pub fn as_f64(self) -> f64 {
        match self {
            SampleValue::Int(v) => v as f64,
            SampleValue::Float(v) => v,
        }
    }
}

impl From<i64> for SampleValue {
    fn from(v: i64) -> Self {
        SampleValue::Int(v)
    }
}

impl From<f64> for SampleValue {
    fn from(v: f64) -> Self {
        SampleValue::Float(v)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Int(v) => write!(f, "{}", v),
            SampleValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One series in the JSON-line format of `/api/v1/import` and `/api/v1/export`.
/// Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub metric: MetricLabels,
    pub values: Vec<SampleValue>,
    pub timestamps: Vec<i64>,
}

impl MetricData {
    pub fn new(metric: MetricLabels, values: Vec<SampleValue>, timestamps: Vec<i64>) -> Self {
        Self {
            metric,
            values,
            timestamps,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.metric.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.values.len() != self.timestamps.len() {
            return Err(ModelError::LengthMismatch {
                values: self.values.len(),
                timestamps: self.timestamps.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
