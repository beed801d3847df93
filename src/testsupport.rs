//! Shared test fixtures for client, retry and refresher test modules.
//!
//! Kept std + tokio only so every test module can script backend behaviour
//! without opening sockets.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{HttpRequest, HttpResponse, RequestHook, Transport};
use crate::error::ApiError;
use crate::refresher::SecretSource;

/// Transport that replays a fixed script of outcomes and records requests.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests seen so far, in dispatch order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("scripted transport exhausted")))
    }
}

/// Hook that keeps `METHOD url` lines for requests and failures.
#[derive(Default)]
pub struct RecordingHook {
    requests: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingHook {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("hook lock").clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().expect("hook lock").clone()
    }
}

impl RequestHook for RecordingHook {
    fn on_request(&self, request: &HttpRequest) {
        self.requests
            .lock()
            .expect("hook lock")
            .push(format!("{} {}", request.method, request.url));
    }

    fn on_failure(&self, request: &HttpRequest, error: &ApiError) {
        self.failures
            .lock()
            .expect("hook lock")
            .push(format!("{} {}: {error}", request.method, request.url));
    }
}

/// Secret source that counts calls and hands out `secret-<n>`.
///
/// `latency` is awaited before answering; calls past `fail_after` fail.
#[derive(Default)]
pub struct CountingSource {
    calls: AtomicUsize,
    latency: Duration,
    fail_after: Option<usize>,
}

impl CountingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::failing_after(0)
    }

    /// First `successes` calls succeed, every later call fails.
    pub fn failing_after(successes: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_after: Some(successes),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretSource for CountingSource {
    async fn issue_secret(&self) -> Result<String, ApiError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_after.is_some_and(|limit| n > limit) {
            return Err(ApiError::status(503, format!("issuer down ({n})"), None));
        }
        Ok(format!("secret-{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_transport_replays_then_exhausts() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, "{}"))]);
        let request = crate::api::ApiRequest::get("/x")
            .into_http("http://h")
            .unwrap();
        assert!(transport.send(&request).await.is_ok());
        assert!(matches!(
            transport.send(&request).await,
            Err(ApiError::Network(_))
        ));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn counting_source_numbers_secrets() {
        let source = CountingSource::new();
        assert_eq!(source.issue_secret().await.unwrap(), "secret-1");
        assert_eq!(source.issue_secret().await.unwrap(), "secret-2");
        assert_eq!(source.calls(), 2);
    }
}
