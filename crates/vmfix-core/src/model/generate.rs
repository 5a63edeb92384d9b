//! Synthetic sample series for fixtures.

use rand::Rng;

use super::data::SampleValue;
use super::error::ModelError;
use super::window::TimeWindow;

/// How sample values are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSpec {
    /// The same value at every timestamp.
    Fixed(SampleValue),
    /// Uniform random integers in `[min, max]`.
    Random { min: i64, max: i64 },
}

impl Default for ValueSpec {
    fn default() -> Self {
        ValueSpec::Random { min: 0, max: 1000 }
    }
}

/// Timestamps (unix ms) and values for one generated series.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub timestamps: Vec<i64>,
    pub values: Vec<SampleValue>,
}

/// Generate one sample every `step_secs` from `window.start` while before
/// `window.end`.
pub fn generate_samples(
    window: &TimeWindow,
    step_secs: i64,
    spec: ValueSpec,
) -> Result<Samples, ModelError> {
    if step_secs <= 0 {
        return Err(ModelError::InvalidStep(step_secs));
    }
    if let ValueSpec::Random { min, max } = spec {
        if min > max {
            return Err(ModelError::InvalidRange { min, max });
        }
    }

    let step_ms = step_secs.saturating_mul(1000);
    let end_ms = window.end.timestamp_millis();
    let mut timestamps = Vec::new();
    let mut t = window.start.timestamp_millis();
    while t < end_ms {
        timestamps.push(t);
        t = t.saturating_add(step_ms);
    }

    let values = match spec {
        ValueSpec::Fixed(v) => vec![v; timestamps.len()],
        ValueSpec::Random { min, max } => {
            let mut rng = rand::thread_rng();
            timestamps
                .iter()
                .map(|_| SampleValue::Int(rng.gen_range(min..=max)))
                .collect()
        }
    };

    tracing::debug!(
        samples = timestamps.len(),
        step_secs,
        "generated sample series"
    );
    Ok(Samples { timestamps, values })
}
