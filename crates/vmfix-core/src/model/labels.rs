//! Label sets attached to imported series.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::selector::SeriesSelector;

/// Labels of one series in VictoriaMetrics import format.
///
/// The fixed fields describe the emitting service; `extra` carries
/// domain-specific labels and is flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLabels {
    #[serde(rename = "__name__")]
    pub name: String,
    #[serde(default = "defaults::job")]
    pub job: String,
    #[serde(default = "defaults::instance")]
    pub instance: String,
    #[serde(default = "defaults::application_id")]
    pub application_id: String,
    #[serde(default = "defaults::application_instance_id")]
    pub application_instance_id: String,
    #[serde(default = "defaults::service_instance_id")]
    pub service_instance_id: String,
    #[serde(default = "defaults::service_name")]
    pub service_name: String,
    #[serde(default = "defaults::version")]
    pub service_version: String,
    #[serde(default = "defaults::sdk_language")]
    pub telemetry_sdk_language: String,
    #[serde(default = "defaults::sdk_name")]
    pub telemetry_sdk_name: String,
    #[serde(default = "defaults::version")]
    pub telemetry_sdk_version: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

mod defaults {
    pub fn job() -> String {
        "DefaultJob".to_string()
    }
    pub fn instance() -> String {
        "default-instance-id".to_string()
    }
    pub fn application_id() -> String {
        "DefaultApp".to_string()
    }
    pub fn application_instance_id() -> String {
        "DefaultInstance".to_string()
    }
    pub fn service_instance_id() -> String {
        "default-service-id".to_string()
    }
    pub fn service_name() -> String {
        "DefaultService".to_string()
    }
    pub fn version() -> String {
        "1.0.0".to_string()
    }
    pub fn sdk_language() -> String {
        "default-language".to_string()
    }
    pub fn sdk_name() -> String {
        "default-sdk".to_string()
    }
}

impl MetricLabels {
    /// Labels with the default service description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: defaults::job(),
            instance: defaults::instance(),
            application_id: defaults::application_id(),
            application_instance_id: defaults::application_instance_id(),
            service_instance_id: defaults::service_instance_id(),
            service_name: defaults::service_name(),
            service_version: defaults::version(),
            telemetry_sdk_language: defaults::sdk_language(),
            telemetry_sdk_name: defaults::sdk_name(),
            telemetry_sdk_version: defaults::version(),
            extra: BTreeMap::new(),
        }
    }

    /// Add or replace a label. Keys naming a fixed field (`job`,
    /// `__name__`, ...) set that field, so the JSON object never carries a
    /// key twice.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fixed_field_mut(&key) {
            Some(field) => *field = value,
            None => {
                self.extra.insert(key, value);
            }
        }
        self
    }

    fn fixed_field_mut(&mut self, key: &str) -> Option<&mut String> {
        let field = match key {
            "__name__" => &mut self.name,
            "job" => &mut self.job,
            "instance" => &mut self.instance,
            "application_id" => &mut self.application_id,
            "application_instance_id" => &mut self.application_instance_id,
            "service_instance_id" => &mut self.service_instance_id,
            "service_name" => &mut self.service_name,
            "service_version" => &mut self.service_version,
            "telemetry_sdk_language" => &mut self.telemetry_sdk_language,
            "telemetry_sdk_name" => &mut self.telemetry_sdk_name,
            "telemetry_sdk_version" => &mut self.telemetry_sdk_version,
            _ => return None,
        };
        Some(field)
    }
}

/// Default `security` label value for route metrics.
pub const DEFAULT_SECURITY: &str = "Unsafe";

/// Route-security labels used by the route metric fixtures.
///
/// `step_count` only applies to the per-step metric, `risk_name` only to the
/// per-risk metric; whichever is set narrows the delete selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabels {
    pub security: String,
    pub step_count: Option<u32>,
    pub risk_name: Option<String>,
}

impl Default for RouteLabels {
    fn default() -> Self {
        Self {
            security: DEFAULT_SECURITY.to_string(),
            step_count: None,
            risk_name: None,
        }
    }
}

impl RouteLabels {
    /// Copy these labels into `labels.extra`.
    pub fn apply(&self, labels: &mut MetricLabels) {
        labels
            .extra
            .insert("security".to_string(), self.security.clone());
        if let Some(step_count) = self.step_count {
            labels
                .extra
                .insert("step_count".to_string(), step_count.to_string());
        }
        if let Some(risk_name) = &self.risk_name {
            labels
                .extra
                .insert("risk_name".to_string(), risk_name.clone());
        }
    }

    /// Selector matching every series of `metric` carrying these labels.
    ///
    /// `risk_name` takes precedence over `step_count` when both are set.
    pub fn selector(&self, metric: &str) -> SeriesSelector {
        let sel = SeriesSelector::new(metric).label("security", &self.security);
        if let Some(risk_name) = &self.risk_name {
            sel.label("risk_name", risk_name)
        } else if let Some(step_count) = self.step_count {
            sel.label("step_count", step_count.to_string())
        } else {
            sel
        }
    }
}
