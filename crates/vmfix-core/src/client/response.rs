//! Response bodies of the Prometheus-compatible query endpoints.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Label set of one series as returned by the query API.
pub type LabelSet = BTreeMap<String, String>;

/// `/prometheus/api/v1/series` body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<LabelSet>,
}

impl SeriesResponse {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `/prometheus/api/v1/query_range` body; only `data.result` is used.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryRangeResponse {
    pub data: QueryRangeData,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryRangeData {
    #[serde(default)]
    pub result: Vec<RangeSeries>,
}

/// One series of a range query: its labels and `[unix_secs, "value"]` points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeSeries {
    pub metric: LabelSet,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

impl RangeSeries {
    /// Point values parsed as floats; unparsable points are skipped.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|(_, v)| v.parse::<f64>().ok())
            .collect()
    }
}
