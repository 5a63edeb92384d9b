//! Metric fixture data: labels, import payloads, selectors, time windows and
//! synthetic sample generation.

mod data;
mod error;
mod generate;
mod labels;
mod selector;
mod window;

pub use data::{MetricData, SampleValue};
pub use error::ModelError;
pub use generate::{generate_samples, Samples, ValueSpec};
pub use labels::{MetricLabels, RouteLabels, DEFAULT_SECURITY};
pub use selector::SeriesSelector;
pub use window::TimeWindow;
