//! Environment overrides.
//!
//! `CHEERS_*` variables win over any file-based value.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_API_URL: &str = "CHEERS_API_URL";
pub(super) const ENV_API_TIMEOUT_SECS: &str = "CHEERS_API_TIMEOUT_SECS";
pub(super) const ENV_LOG: &str = "CHEERS_LOG";
/// Bearer token consumed by the CLI; not part of [`Config`].
pub const ENV_TOKEN: &str = "CHEERS_TOKEN";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup, ENV_API_URL) {
        config.api.base_url = url;
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_API_TIMEOUT_SECS) {
        // Clamp to at least 1 second so a zero never means "no timeout".
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_API_TIMEOUT_SECS} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed.max(1);
    }
    if let Some(level) = non_empty(env_lookup, ENV_LOG) {
        config.log.level = level;
    }
    Ok(())
}

/// Look up a variable, treating blank values as unset.
pub(super) fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
