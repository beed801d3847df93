//! The single chokepoint for backend calls.
//!
//! [`ApiClient`] owns base URL resolution, header construction, dispatch and
//! error normalization. Endpoint helpers (`users`, `wishlist`, `qr`) are thin
//! `impl ApiClient` blocks on top of [`ApiClient::request`].

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use super::hook::{RequestHook, TracingHook};
use super::request::{ApiRequest, HttpRequest};
use super::retry::RetryPolicy;
use super::transport::{HttpResponse, ReqwestTransport, Transport};
use crate::config::{ApiConfig, RetryConfig};
use crate::error::ApiError;

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    hook: Arc<dyn RequestHook>,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    /// Build a client from resolved configuration, using the reqwest
    /// transport and the tracing hook.
    pub fn new(api: &ApiConfig, retry: &RetryConfig) -> Self {
        Self::with_transport(&api.base_url, Arc::new(ReqwestTransport::new(api.timeout())))
            .with_retry_policy(RetryPolicy::from_config(retry))
    }

    /// Build a client over an arbitrary transport with default policies.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            transport,
            hook: Arc::new(TracingHook),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Policy used by the retrying read helpers.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Send one request and decode a JSON success body into `T`.
    ///
    /// Exactly one attempt is made; see [`fetch_with_retry`](super::fetch_with_retry)
    /// for the retrying wrapper used by reads.
    pub async fn request<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let http_request = request.into_http(&self.base_url)?;
        self.hook.on_request(&http_request);
        let result = self.dispatch(&http_request).await;
        if let Err(err) = &result {
            self.hook.on_failure(&http_request, err);
        }
        result
    }

    /// Like [`request`](Self::request) but keeps the body as untyped JSON.
    pub async fn request_value(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        self.request(request).await
    }

    async fn dispatch<T>(&self, request: &HttpRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.transport.send(request).await?;
        normalize_response(response)
    }
}

/// Map a raw response onto the error taxonomy, or decode its JSON body.
fn normalize_response<T>(response: HttpResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let HttpResponse {
        status,
        body,
        retry_after_secs,
    } = response;
    if !status.is_success() {
        let body = body.unwrap_or_else(|_| synthetic_status_text(status));
        if status == StatusCode::NOT_FOUND {
            debug!(body = %body, "api entity not found");
            return Err(ApiError::EntityNotFound);
        }
        return Err(ApiError::status(status.as_u16(), body, retry_after_secs));
    }

    let body = body.map_err(ApiError::Network)?;
    serde_json::from_str(&body).map_err(ApiError::InvalidResponse)
}

/// Diagnostic text used when an error body could not be read.
fn synthetic_status_text(status: StatusCode) -> String {
    format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{RecordingHook, ScriptedTransport};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    fn client_with(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::with_transport("http://backend.test/", transport.clone())
    }

    #[tokio::test]
    async fn success_body_is_decoded() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, r#"{"ok":true}"#))]);
        let ping: Ping = client_with(&transport)
            .request(ApiRequest::get("/api/ping"))
            .await
            .unwrap();
        assert_eq!(ping, Ping { ok: true });
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://backend.test/api/ping");
    }

    #[tokio::test]
    async fn sends_bearer_and_content_type_headers() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, "{}"))]);
        client_with(&transport)
            .request_value(ApiRequest::get("/api/user").bearer("secret-token"))
            .await
            .unwrap();
        let sent = transport.requests();
        assert_eq!(sent[0].header("authorization"), Some("Bearer secret-token"));
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn not_found_is_distinguished_regardless_of_body() {
        for body in ["", "Not Found", r#"{"error":"user missing"}"#, "<html>500</html>"] {
            let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(404, body))]);
            let err = client_with(&transport)
                .request_value(ApiRequest::get("/api/user"))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::EntityNotFound), "body {body:?} gave {err}");
        }
    }

    #[tokio::test]
    async fn other_statuses_carry_code_and_body() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            422,
            r#"{"error":"username taken"}"#,
        ))]);
        let err = client_with(&transport)
            .request_value(ApiRequest::post("/api/user"))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { code, body, .. } => {
                assert_eq!(code, 422);
                assert!(body.contains("username taken"));
            }
            other => panic!("expected status error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn unreadable_error_body_falls_back_to_status_text() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Err("connection closed mid-body".into()),
            retry_after_secs: None,
        })]);
        let err = client_with(&transport)
            .request_value(ApiRequest::get("/api/user"))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { code, body, .. } => {
                assert_eq!(code, 503);
                assert_eq!(body, "HTTP 503 Service Unavailable");
            }
            other => panic!("expected status error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_response() {
        let transport =
            ScriptedTransport::new(vec![Ok(HttpResponse::new(200, "<html>maintenance</html>"))]);
        let err = client_with(&transport)
            .request_value(ApiRequest::get("/api/user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "got: {err}");
    }

    #[tokio::test]
    async fn wrong_json_shape_is_invalid_response() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, r#"{"ok":"yes"}"#))]);
        let err = client_with(&transport)
            .request::<Ping>(ApiRequest::get("/api/ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "got: {err}");
    }

    #[tokio::test]
    async fn network_failures_pass_through_once() {
        let transport = ScriptedTransport::new(vec![Err(ApiError::network("connection refused"))]);
        let err = client_with(&transport)
            .request_value(ApiRequest::get("/api/user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got: {err}");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn hook_sees_every_request_and_failure() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(200, "{}")),
            Ok(HttpResponse::new(500, "boom")),
        ]);
        let hook = Arc::new(RecordingHook::default());
        let client = client_with(&transport).with_hook(hook.clone());
        client.request_value(ApiRequest::get("/a")).await.unwrap();
        client
            .request_value(ApiRequest::get("/b"))
            .await
            .unwrap_err();
        assert_eq!(
            hook.requests(),
            vec![
                "GET http://backend.test/a".to_string(),
                "GET http://backend.test/b".to_string()
            ]
        );
        assert_eq!(
            hook.failures(),
            vec!["GET http://backend.test/b: status 500: boom".to_string()]
        );
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_transport() {
        let transport = ScriptedTransport::new(vec![]);
        let err = client_with(&transport)
            .request_value(ApiRequest::get("/x").header("bad header", "v"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "got: {err}");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn json_body_reaches_transport() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(201, r#"{"ok":true}"#))]);
        let _: Ping = client_with(&transport)
            .request(
                ApiRequest::post("/api/ping")
                    .json(&json!({ "hello": "world" }))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some(r#"{"hello":"world"}"#)
        );
    }

    #[tokio::test]
    async fn retry_after_hint_is_kept_on_status_errors() {
        let transport = ScriptedTransport::new(vec![Ok(
            HttpResponse::new(429, "slow down").with_retry_after(4)
        )]);
        let err = client_with(&transport)
            .request_value(ApiRequest::get("/api/user"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.retry_after_secs(), Some(4));
    }

    #[tokio::test]
    async fn unparseable_base_url_never_reaches_transport() {
        let transport = ScriptedTransport::new(vec![]);
        let err = ApiClient::with_transport("not a url", transport.clone())
            .request_value(ApiRequest::get("/api/user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "got: {err}");
        assert!(transport.requests().is_empty());
    }
}
