//! Request descriptors and header construction.
//!
//! An [`ApiRequest`] is what endpoint helpers build; [`ApiRequest::into_http`]
//! resolves it against a base URL into the [`HttpRequest`] a transport sends.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::ApiError;

/// Outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// Pre-encoded text, for callers that override `Content-Type`.
    Text(String),
}

impl RequestBody {
    fn into_text(self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// One logical backend call: endpoint, method, optional bearer token, body and
/// extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the client base URL, including any query string.
    pub endpoint: String,
    pub token: Option<String>,
    pub body: Option<RequestBody>,
    /// Merged after the defaults; a same-named header replaces the default.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            token: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// Attach a bearer token. Blank tokens are ignored.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T>(mut self, body: &T) -> Result<Self, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::InvalidRequest(format!("failed to encode body: {err}")))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build outgoing headers: JSON content type, then bearer auth, then
    /// caller headers (which may replace either of the first two).
    pub fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ApiError::InvalidRequest("bearer token contains invalid header characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidRequest(format!("invalid header name `{name}`")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                ApiError::InvalidRequest(format!("invalid value for header `{name}`"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Resolve against `base_url` (already stripped of trailing `/`). The
    /// joined URL must parse as an absolute URL.
    pub fn into_http(self, base_url: &str) -> Result<HttpRequest, ApiError> {
        let headers = self.build_headers()?;
        let url = format!("{base_url}{}", self.endpoint);
        if let Err(err) = url::Url::parse(&url) {
            return Err(ApiError::InvalidRequest(format!("invalid url `{url}`: {err}")));
        }
        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body: self.body.map(RequestBody::into_text),
        })
    }
}

/// Fully resolved request handed to a [`Transport`](super::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Header value as text, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
