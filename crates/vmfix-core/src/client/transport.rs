//! HTTP transport seam between the client and the wire.
//!
//! [`CurlTransport`] uses libcurl (one `Easy` handle per request) and runs in
//! the calling thread.

use std::time::Duration;
use url::Url;

use super::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully built request: method, absolute URL with query, optional body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as text, lossy, for error messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns whatever the server answered.
/// Status interpretation is left to the caller.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).send(request)
    }
}

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// libcurl-backed transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    pub auth: Option<BasicAuth>,
    /// Verify the server certificate and host name. Test stands usually run
    /// with self-signed certificates, hence off by default.
    pub verify_tls: bool,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            auth: None,
            verify_tls: false,
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(request.url.as_str())?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if !self.verify_tls {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }
        if let Some(auth) = &self.auth {
            easy.username(&auth.user)?;
            easy.password(&auth.password)?;
        }

        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(request.body.as_deref().unwrap_or(&[]))?;
            }
        }
        if request.body.is_some() {
            let mut list = curl::easy::List::new();
            list.append("Content-Type: application/json")?;
            // No 100-continue round trip for large import bodies.
            list.append("Expect:")?;
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!(
            method = ?request.method,
            url = %request.url,
            status,
            bytes = body.len(),
            "http request done"
        );
        Ok(HttpResponse { status, body })
    }
}
