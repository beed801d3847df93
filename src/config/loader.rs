//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::apply_runtime_env_overrides;
use super::sources::{config_root_dir, read_config_text_with_sources};
use super::{Config, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_source(path_override)?.config)
}

/// Load configuration and report which file (if any) it came from.
pub fn load_config_with_source(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_with_overrides(path_override, None)
}

/// Like [`load_config_with_source`], plus a `--base-url` style override that
/// beats every other source and is validated like them.
pub fn load_config_with_overrides(
    path_override: Option<&str>,
    base_url_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        base_url_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    base_url_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    if let Some(url) = base_url_override.map(str::trim).filter(|url| !url.is_empty()) {
        config.api.base_url = url.to_string();
    }
    validate(&config)?;
    Ok(LoadedConfig { config, source })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
    }
    if url::Url::parse(config.api.base_url.trim()).is_err() {
        return Err(ConfigError::Invalid(format!(
            "api.base_url `{}` is not an absolute URL",
            config.api.base_url
        )));
    }
    if config.qr.refresh_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "qr.refresh_interval_ms must be greater than zero".into(),
        ));
    }
    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        return Err(ConfigError::Invalid(format!(
            "retry.max_delay_ms ({}) is below retry.base_delay_ms ({})",
            config.retry.max_delay_ms, config.retry.base_delay_ms
        )));
    }
    Ok(())
}
