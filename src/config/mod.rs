//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. The `--base-url` CLI flag (base URL only)
//! 2. Environment variables (`CHEERS_API_URL`, `CHEERS_API_TIMEOUT_SECS`,
//!    `CHEERS_LOG`)
//! 3. TOML file specified via --config CLI flag
//! 4. ./cheers.toml in the current directory
//! 5. $XDG_CONFIG_HOME/cheers/cheers.toml (or ~/.config/cheers/cheers.toml)
//! 6. Built-in defaults
//!
//! Validation runs after every override is applied.

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use env::ENV_TOKEN;
pub use loader::{load_config, load_config_with_overrides, load_config_with_source};
pub use sources::{config_root_dir, ConfigSource};
pub use types::{ApiConfig, Config, LoadedConfig, LogConfig, QrConfig, RetryConfig, RetryOn};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
