//! Configuration data model.
//!
//! This module holds struct/enum definitions plus default values. Source
//! discovery and env precedence live in `sources` and `env`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_BASE_DELAY_MS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_QR_COOLDOWN_MS,
    DEFAULT_QR_REFRESH_INTERVAL_MS, DEFAULT_QR_VALIDITY_SECS,
};

/// Which failures the read retry loop treats as worth another attempt.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetryOn {
    /// Transport failures, 429 and 5xx only.
    #[default]
    Transient,
    /// Every failure, including 4xx and not-found.
    Any,
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub qr: QrConfig,
    pub log: LogConfig,
}

/// Backend connection settings used by the HTTP client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout; clamped to at least one second.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Backoff settings for idempotent reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub retry_on: RetryOn,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            retry_on: RetryOn::default(),
        }
    }
}

/// Timing of the rotating QR secret.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub cooldown_ms: u64,
    pub refresh_interval_ms: u64,
    pub validity_secs: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_QR_COOLDOWN_MS,
            refresh_interval_ms: DEFAULT_QR_REFRESH_INTERVAL_MS,
            validity_secs: DEFAULT_QR_VALIDITY_SECS,
        }
    }
}

/// Logging preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `cheers=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Configuration payload plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: super::ConfigSource,
}
