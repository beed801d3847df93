//! HTTP transport seam.
//!
//! The client talks to the network only through [`Transport`], so tests can
//! substitute a scripted implementation and inspect every built request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::{Duration, SystemTime};

use super::request::HttpRequest;
use crate::error::{ApiError, BoxError};

/// Status plus body text as received from the wire.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Body text, or the error raised while reading it.
    pub body: Result<String, BoxError>,
    /// Parsed `Retry-After` header, in seconds.
    pub retry_after_secs: Option<u64>,
}

#[cfg(test)]
impl HttpResponse {
    /// Test shorthand; panics on a status outside 100..=999.
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: Ok(body.into()),
            retry_after_secs: None,
        }
    }

    pub(crate) fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }
}

/// Sends one resolved request. Transport failures map to
/// [`ApiError::Network`], requests reqwest refuses to build map to
/// [`ApiError::InvalidRequest`]; HTTP statuses are returned, never raised.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send().await?;
        let status = response.status();
        let retry_after_secs = parse_retry_after_secs(response.headers());
        let body = response.text().await.map_err(BoxError::from);
        Ok(HttpResponse {
            status,
            body,
            retry_after_secs,
        })
    }
}

/// Read `Retry-After` as delta-seconds or an HTTP date. A date in the past
/// yields zero.
pub fn parse_retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }
    let at = httpdate::parse_http_date(value).ok()?;
    let wait = at
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO);
    Some(wait.as_secs() + u64::from(wait.subsec_nanos() > 0))
}

/// Build an HTTP client with timeout applied.
fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
