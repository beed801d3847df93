//! Unified error types for the client.

use std::fmt;

/// Boxed transport error, so tests can inject failures without a live socket.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the HTTP API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, reset, or timeout.
    Network(BoxError),
    /// Non-2xx status other than 404, with the diagnostic body text and the
    /// server's `Retry-After` hint in seconds, if any.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
    },
    /// The server answered 404. Callers branch on this for fetch-or-create.
    EntityNotFound,
    /// A success status carried a body that is not valid JSON.
    InvalidResponse(serde_json::Error),
    /// The request could not be built (body encoding, header, or URL).
    InvalidRequest(String),
}

impl ApiError {
    /// Wrap any transport error.
    pub fn network<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Network(err.into())
    }

    /// Build a status error.
    pub fn status(code: u16, body: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body: body.into(),
            retry_after_secs,
        }
    }

    /// `Retry-After` delay in seconds, when the server sent one.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// HTTP status code for status-bearing errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::EntityNotFound => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound)
    }

    /// True when the failure was the transport's request timeout.
    pub fn is_timeout(&self) -> bool {
        let Self::Network(inner) = self else {
            return false;
        };
        inner
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    }

    /// True for failures a later identical request may not repeat: timeouts,
    /// connect and send/receive failures, 429, and any 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(inner) => match inner.downcast_ref::<reqwest::Error>() {
                Some(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
                None => true,
            },
            Self::Status { code, .. } => *code == 429 || (500..=599).contains(code),
            Self::EntityNotFound | Self::InvalidResponse(_) | Self::InvalidRequest(_) => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::EntityNotFound => write!(f, "entity not found"),
            Self::InvalidResponse(e) => write!(f, "invalid response: {e}"),
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e.as_ref()),
            Self::InvalidResponse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    /// Builder errors (bad URL, bad header) never reached the wire.
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            return Self::InvalidRequest(e.to_string());
        }
        Self::Network(Box::new(e))
    }
}
