//! Observation hook for outgoing requests and their failures.
//!
//! The client has no other diagnostics surface, so every dispatch and every
//! normalized failure goes through a [`RequestHook`].

use tracing::{debug, warn};

use super::request::HttpRequest;
use crate::error::ApiError;

pub trait RequestHook: Send + Sync {
    /// Called before the request is handed to the transport.
    fn on_request(&self, request: &HttpRequest);
    /// Called once per failed request with the error returned to the caller.
    fn on_failure(&self, request: &HttpRequest, error: &ApiError);
}

/// Default hook: emits `tracing` events. Never logs header values, so bearer
/// tokens stay out of logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl RequestHook for TracingHook {
    fn on_request(&self, request: &HttpRequest) {
        debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.headers.contains_key(reqwest::header::AUTHORIZATION),
            "api request"
        );
    }

    fn on_failure(&self, request: &HttpRequest, error: &ApiError) {
        warn!(
            method = %request.method,
            url = %request.url,
            status = error.status_code(),
            error = %error,
            "api request failed"
        );
    }
}
