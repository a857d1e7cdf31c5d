use std::path::PathBuf;

use mlo_i18n::I18nError;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, CliError>;

/// Failures while wiring the host services and i18n before mount.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no data directory: set --data-dir, `data_dir` in the config, or MLO_DATA_DIR")]
    DataDir,

    #[error("cannot prepare data directory {path}: {source}")]
    CreateDataDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("i18n plugin rejected by the application: {message}")]
    Plugin { message: String },
}

impl BootstrapError {
    #[must_use]
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the `mlo` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error("{0}")]
    I18n(#[from] I18nError),

    #[error("failed to install logging: {message}")]
    Logging { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidArgument { .. } => 2,
            Self::I18n(I18nError::UnsupportedLocale(_)) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
