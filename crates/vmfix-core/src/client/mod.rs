//! VictoriaMetrics fixture client.
//!
//! Thin wrappers over the import, delete, series, range-query and export
//! endpoints, plus confirmation loops (see [`fixtures`]) that poll until
//! writes become visible to reads.

mod error;
mod fixtures;
mod response;
mod transport;

pub use error::ClientError;
pub use fixtures::ImportRequest;
pub use response::{LabelSet, RangeSeries, SeriesResponse};
pub use transport::{BasicAuth, CurlTransport, HttpRequest, HttpResponse, Method, Transport};

use url::Url;

use crate::config::FixtureConfig;
use crate::model::{MetricData, TimeWindow};
use crate::retry::{CancelToken, RetryExecutor, RetryPolicy};
use response::QueryRangeResponse;

const PATH_SERIES: &str = "/prometheus/api/v1/series";
const PATH_QUERY_RANGE: &str = "/prometheus/api/v1/query_range";
const PATH_EXPORT: &str = "/api/v1/export";
const PATH_IMPORT: &str = "/api/v1/import";
const PATH_DELETE: &str = "/api/v1/admin/tsdb/delete_series";

/// Client for one metrics backend.
///
/// `poll` drives the confirmation loops; `request_retry` re-sends single
/// requests that failed at the connection level (no retries by default).
pub struct MetricsClient<T = CurlTransport> {
    transport: T,
    base: Url,
    poll: RetryPolicy,
    request_retry: RetryPolicy,
    cancel: Option<CancelToken>,
}

impl MetricsClient<CurlTransport> {
    /// Build a curl-backed client from loaded settings.
    pub fn from_config(cfg: &FixtureConfig) -> Result<Self, ClientError> {
        let transport = CurlTransport {
            auth: cfg.basic_auth(),
            verify_tls: cfg.verify_tls,
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.request_timeout(),
        };
        Ok(Self::new(transport, &cfg.url)?.with_poll_policy(cfg.poll_policy()))
    }
}

impl<T: Transport> MetricsClient<T> {
    pub fn new(transport: T, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            transport,
            base: Url::parse(base_url)?,
            poll: RetryPolicy::polling(),
            request_retry: RetryPolicy::once(),
            cancel: None,
        })
    }

    pub fn with_poll_policy(mut self, policy: RetryPolicy) -> Self {
        self.poll = policy;
        self
    }

    pub fn with_request_retry(mut self, policy: RetryPolicy) -> Self {
        self.request_retry = policy;
        self
    }

    /// Make every retry loop of this client abort once `token` is set.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn poll_policy(&self) -> RetryPolicy {
        self.poll
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Import one series. Expects 204.
    pub fn import(&self, data: &MetricData) -> Result<(), ClientError> {
        self.import_many(std::slice::from_ref(data))
    }

    /// Import several series in one request, one JSON object per line.
    pub fn import_many(&self, data: &[MetricData]) -> Result<(), ClientError> {
        let mut body = Vec::new();
        for series in data {
            series.validate()?;
            serde_json::to_writer(&mut body, series).map_err(ClientError::Encode)?;
            body.push(b'\n');
        }
        let request = HttpRequest {
            method: Method::Post,
            url: self.endpoint(PATH_IMPORT, &[]),
            body: Some(body),
        };
        self.send_expecting("import", &request, 204)?;
        tracing::info!(series = data.len(), "imported series");
        Ok(())
    }

    /// Delete every series matching any of `selectors`. Expects 204.
    pub fn delete_series<S: AsRef<str>>(&self, selectors: &[S]) -> Result<(), ClientError> {
        let request = HttpRequest {
            method: Method::Post,
            url: self.endpoint(PATH_DELETE, &match_params(selectors)),
            body: None,
        };
        self.send_expecting("delete_series", &request, 204)?;
        tracing::info!(selectors = ?as_strs(selectors), "deleted series");
        Ok(())
    }

    /// List series matching `selectors`, without samples.
    pub fn series<S: AsRef<str>>(&self, selectors: &[S]) -> Result<SeriesResponse, ClientError> {
        let request = HttpRequest {
            method: Method::Get,
            url: self.endpoint(PATH_SERIES, &match_params(selectors)),
            body: None,
        };
        let response = self.send_expecting("series", &request, 200)?;
        decode("series", &response.body)
    }

    /// Evaluate `query` over `window` with `step_secs` resolution; returns
    /// `data.result`.
    pub fn query_range(
        &self,
        query: &str,
        window: &TimeWindow,
        step_secs: i64,
    ) -> Result<Vec<RangeSeries>, ClientError> {
        let params = vec![
            ("query", query.to_string()),
            ("start", unix_secs(window.start.timestamp_millis())),
            ("end", unix_secs(window.end.timestamp_millis())),
            ("step", step_secs.to_string()),
        ];
        let request = HttpRequest {
            method: Method::Get,
            url: self.endpoint(PATH_QUERY_RANGE, &params),
            body: None,
        };
        let response = self.send_expecting("query_range", &request, 200)?;
        let parsed: QueryRangeResponse = decode("query_range", &response.body)?;
        Ok(parsed.data.result)
    }

    /// Export raw samples of series matching `selectors`.
    pub fn export<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<MetricData>, ClientError> {
        let request = HttpRequest {
            method: Method::Get,
            url: self.endpoint(PATH_EXPORT, &match_params(selectors)),
            body: None,
        };
        let response = self.send_expecting("export", &request, 200)?;
        let text = response.text();
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).map_err(|source| ClientError::Decode {
                    operation: "export",
                    source,
                })
            })
            .collect()
    }

    /// Build an endpoint URL under the base URL, keeping any base path prefix.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, path));
        url.set_query(None);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Send, re-sending on transient transport errors per `request_retry`,
    /// and check the status.
    fn send_expecting(
        &self,
        operation: &'static str,
        request: &HttpRequest,
        expected: u32,
    ) -> Result<HttpResponse, ClientError> {
        let response = self
            .executor(self.request_retry, operation)
            .execute_on_error(|| self.transport.send(request), ClientError::is_transient)?;
        if response.status != expected {
            return Err(ClientError::UnexpectedStatus {
                operation,
                status: response.status,
                expected,
                body: response.text(),
            });
        }
        Ok(response)
    }

    fn executor(&self, policy: RetryPolicy, operation: &str) -> RetryExecutor {
        let exec = RetryExecutor::new(policy, operation);
        match &self.cancel {
            Some(token) => exec.with_cancel(token.clone()),
            None => exec,
        }
    }
}

fn match_params<S: AsRef<str>>(selectors: &[S]) -> Vec<(&'static str, String)> {
    selectors
        .iter()
        .map(|s| ("match[]", s.as_ref().to_string()))
        .collect()
}

fn as_strs<S: AsRef<str>>(selectors: &[S]) -> Vec<&str> {
    selectors.iter().map(AsRef::as_ref).collect()
}

/// Unix seconds with millisecond precision, as the query API accepts.
fn unix_secs(millis: i64) -> String {
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

fn decode<D: serde::de::DeserializeOwned>(
    operation: &'static str,
    body: &[u8],
) -> Result<D, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { operation, source })
}
