//! Errors returned by the metrics client.

use thiserror::Error;

use crate::model::ModelError;
use crate::retry::RetryError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// libcurl reported an error (timeout, connection, TLS, ...).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// Non-curl transport failure (used by alternative transports).
    #[error("transport: {0}")]
    Transport(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The endpoint answered with a status other than the expected one.
    #[error("{operation} returned HTTP {status}, expected {expected}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u32,
        expected: u32,
        body: String,
    },
    #[error("{operation}: cannot decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A confirmation loop gave up (exhausted or cancelled).
    #[error(transparent)]
    Retry(Box<RetryError<ClientError>>),
}

impl ClientError {
    /// Whether a request that failed this way is worth sending again as is.
    ///
    /// Timeouts and connection-level failures are; everything the server
    /// actually answered is not.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Curl(e) => {
                e.is_operation_timedout()
                    || e.is_couldnt_connect()
                    || e.is_couldnt_resolve_host()
                    || e.is_read_error()
                    || e.is_recv_error()
                    || e.is_send_error()
                    || e.is_got_nothing()
            }
            ClientError::Transport(_) => true,
            _ => false,
        }
    }
}

impl From<RetryError<ClientError>> for ClientError {
    fn from(e: RetryError<ClientError>) -> Self {
        match e {
            RetryError::Operation(inner) => inner,
            other => ClientError::Retry(Box::new(other)),
        }
    }
}
