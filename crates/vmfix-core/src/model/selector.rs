//! PromQL series selectors (`name{label="value", ...}`).

use std::fmt;

/// A series selector with exact-match label filters, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelector {
    metric: String,
    labels: Vec<(String, String)>,
}

impl SeriesSelector {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            labels: Vec::new(),
        }
    }

    /// Add an exact-match filter.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for SeriesSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metric)?;
        if self.labels.is_empty() {
            return Ok(());
        }
        write!(f, "{{")?;
        for (i, (k, v)) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=\"{}\"", k, escape(v))?;
        }
        write!(f, "}}")
    }
}

impl From<SeriesSelector> for String {
    fn from(sel: SeriesSelector) -> Self {
        sel.to_string()
    }
}
