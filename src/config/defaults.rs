//! Default configuration constants.
//!
//! Keeping defaults in one module lets the config types, the retry policy and
//! the refresher share the same literals.

/// Local development backend used when nothing else is configured.
pub(super) const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Per-request timeout enforced by the HTTP transport.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
/// Retries after the first attempt for idempotent reads.
pub(super) const DEFAULT_MAX_RETRIES: u32 = 3;
/// First backoff delay; doubles per attempt.
pub(super) const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
/// Backoff ceiling.
pub(super) const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
/// Minimum spacing between two successful QR secret fetches.
pub(super) const DEFAULT_QR_COOLDOWN_MS: u64 = 15_000;
/// Proactive rotation cadence, below the server-side validity window.
pub(super) const DEFAULT_QR_REFRESH_INTERVAL_MS: u64 = 55_000;
/// Server-side validity of one QR secret; also the countdown start value.
pub(super) const DEFAULT_QR_VALIDITY_SECS: u32 = 60;
/// Log level used when neither `RUST_LOG` nor `CHEERS_LOG` is set.
pub(super) const DEFAULT_LOG_LEVEL: &str = "info";
/// File name looked up locally and under the global config root.
pub(super) const CONFIG_FILE_NAME: &str = "cheers.toml";
