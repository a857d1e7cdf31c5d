//! Log subscriber installation for the `mlo` binary.
//!
//! `RUST_LOG` wins over the configured filter; an unparsable filter falls
//! back to [`DEFAULT_FILTER`]. Output goes to stderr so stdout stays clean
//! for command results.

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Filter used when neither `RUST_LOG` nor the config yields a valid one.
pub const DEFAULT_FILTER: &str = "info";

/// Where the active filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Env,
    Config,
    Default,
}

/// Pick the filter from `env` (the `RUST_LOG` value) or `configured`.
#[must_use]
pub fn resolve_filter(env: Option<&str>, configured: &str) -> (EnvFilter, FilterSource) {
    if let Some(filter) = env.filter(|v| !v.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(filter) {
            return (filter, FilterSource::Env);
        }
    }
    match EnvFilter::try_new(configured) {
        Ok(filter) => (filter, FilterSource::Config),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), FilterSource::Default),
    }
}

/// Install the global fmt subscriber.
pub fn init(configured: &str) -> Result<FilterSource, CliError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, source) = resolve_filter(env.as_deref(), configured);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::Logging {
            message: err.to_string(),
        })?;
    tracing::debug!(target: "mlo.app", source = ?source, "logging installed");
    Ok(source)
}
