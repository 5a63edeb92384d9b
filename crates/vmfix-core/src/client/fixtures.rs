//! Confirmation loops and fixture import built on the retry executor.
//!
//! Deletes and imports are not visible to reads right away; these helpers
//! poll the read endpoints under the client's poll policy until the expected
//! state shows up, retrying on errors and on unsatisfactory results alike.

use chrono::Duration;

use super::error::ClientError;
use super::response::RangeSeries;
use super::transport::Transport;
use super::MetricsClient;
use crate::model::{
    generate_samples, MetricData, MetricLabels, RouteLabels, TimeWindow, ValueSpec,
};

/// Parameters for importing one generated route-metric series.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Base labels; `__name__` is the metric name.
    pub labels: MetricLabels,
    pub route: RouteLabels,
    /// Sample window; `None` means the hour before the import call.
    pub window: Option<TimeWindow>,
    pub step_secs: i64,
    pub values: ValueSpec,
    /// Delete the series matching the route selector first and wait until
    /// the deletion is visible.
    pub delete_first: bool,
}

impl ImportRequest {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            labels: MetricLabels::new(metric),
            route: RouteLabels::default(),
            window: None,
            step_secs: 60,
            values: ValueSpec::default(),
            delete_first: true,
        }
    }

    /// Selector that the pre-import delete uses.
    pub fn delete_selector(&self) -> String {
        self.route.selector(&self.labels.name).to_string()
    }

    /// Generate the payload. The default window is read from the clock here.
    pub fn build(&self) -> Result<MetricData, ClientError> {
        let window = self.window.unwrap_or_else(TimeWindow::last_hour);
        let samples = generate_samples(&window, self.step_secs, self.values)?;
        let mut labels = self.labels.clone();
        self.route.apply(&mut labels);
        Ok(MetricData::new(labels, samples.values, samples.timestamps))
    }
}

impl<T: Transport> MetricsClient<T> {
    /// Delete matching series, then poll the series listing until it is empty.
    pub fn delete_and_confirm<S: AsRef<str>>(&self, selectors: &[S]) -> Result<(), ClientError> {
        self.delete_series(selectors)?;
        self.executor(self.poll, "confirm series deleted")
            .execute(|| self.series(selectors), |r| r.is_empty())?;
        tracing::debug!("series deletion confirmed");
        Ok(())
    }

    /// Poll a range query until it returns at least one series.
    pub fn wait_for_range_data(
        &self,
        query: &str,
        window: &TimeWindow,
        step_secs: i64,
    ) -> Result<Vec<RangeSeries>, ClientError> {
        let result = self
            .executor(self.poll, "wait for range data")
            .execute(
                || self.query_range(query, window, step_secs),
                |result| !result.is_empty(),
            )?;
        tracing::debug!(series = result.len(), query, "range data visible");
        Ok(result)
    }

    /// Same as [`wait_for_range_data`](Self::wait_for_range_data) over the
    /// `span` before now, read at call time.
    pub fn wait_for_recent_data(
        &self,
        query: &str,
        span: Duration,
        step_secs: i64,
    ) -> Result<Vec<RangeSeries>, ClientError> {
        self.wait_for_range_data(query, &TimeWindow::last(span)?, step_secs)
    }

    /// Generate a series, optionally clear the previous one, and import it.
    /// Returns the imported payload.
    pub fn import_generated(&self, request: &ImportRequest) -> Result<MetricData, ClientError> {
        let data = request.build()?;
        if request.delete_first {
            self.delete_and_confirm(&[request.delete_selector()])?;
        }
        self.import(&data)?;
        tracing::info!(
            metric = %data.metric.name,
            samples = data.len(),
            "imported generated series"
        );
        Ok(data)
    }
}
