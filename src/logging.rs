//! Tracing subscriber setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` wins, then the configured directive, then
/// `info` if the directive does not parse.
pub fn env_filter(configured_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a compact stderr subscriber. Returns `false` if one was already set.
pub fn init(configured_level: &str) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(configured_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_falls_back_without_panicking() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = env_filter("cheers=loud");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn configured_directive_is_used() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = env_filter("cheers=debug");
        assert_eq!(filter.to_string(), "cheers=debug");
    }
}
