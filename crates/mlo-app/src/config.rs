//! Application configuration.
//!
//! Loaded from TOML or JSON at startup; every field has a default, so an
//! empty file (or no file) yields [`AppConfig::default`].
//!
//! ```toml
//! # mlo.toml
//! log_filter = "mlo=debug,info"
//!
//! [storage]
//! native_store_file = "settings.json"
//!
//! [i18n]
//! locales_dir = "/opt/mlo/locales"
//!
//! [confirm_delete]
//! timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use web_time::Duration;

use mlo_host::{EnvMarkerProbe, paths};
use mlo_i18n::LOCALE_STORAGE_KEY;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the store files. `None` uses the platform config
    /// directory.
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive. `RUST_LOG` takes precedence when set.
    pub log_filter: String,
    pub storage: StorageConfig,
    pub i18n: I18nConfig,
    pub confirm_delete: ConfirmDeleteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "info".to_string(),
            storage: StorageConfig::default(),
            i18n: I18nConfig::default(),
            confirm_delete: ConfirmDeleteConfig::default(),
        }
    }
}

/// Backing files and the native-shell marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Native store file, relative to the data directory.
    pub native_store_file: String,
    /// Local-storage file, relative to the data directory.
    pub local_storage_file: String,
    /// Environment variable whose presence signals the native shell.
    pub shell_marker_var: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            native_store_file: "settings.json".to_string(),
            local_storage_file: "local-storage.json".to_string(),
            shell_marker_var: EnvMarkerProbe::DEFAULT_VAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Local-storage key for the chosen locale.
    pub locale_key: String,
    /// Directory of bundle overrides (`<dir>/<locale>/<part>.json`).
    pub locales_dir: Option<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale_key: LOCALE_STORAGE_KEY.to_string(),
            locales_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmDeleteConfig {
    pub timeout_ms: u64,
}

impl Default for ConfirmDeleteConfig {
    fn default() -> Self {
        Self { timeout_ms: 3500 }
    }
}

impl ConfirmDeleteConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension (`.json` is JSON,
    /// anything else TOML), then validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Problems with the configuration. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.confirm_delete.timeout_ms == 0 {
            errors.push("confirm_delete.timeout_ms must be > 0".into());
        }
        if self.i18n.locale_key.trim().is_empty() {
            errors.push("i18n.locale_key must not be empty".into());
        }
        if self.storage.shell_marker_var.is_empty() {
            errors.push("storage.shell_marker_var must not be empty".into());
        }
        for (name, file) in [
            ("storage.native_store_file", &self.storage.native_store_file),
            ("storage.local_storage_file", &self.storage.local_storage_file),
        ] {
            if file.is_empty() {
                errors.push(format!("{name} must not be empty"));
            } else if Path::new(file).is_absolute() {
                errors.push(format!("{name} must be relative to data_dir, got {file}"));
            }
        }
        if self.storage.native_store_file == self.storage.local_storage_file {
            errors.push("storage.native_store_file and storage.local_storage_file must differ".into());
        }
        if self.log_filter.trim().is_empty() {
            errors.push("log_filter must not be empty".into());
        }

        errors
    }

    /// The configured data directory, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(paths::data_dir)
    }
}

/// Errors loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.storage.native_store_file, "settings.json");
        assert_eq!(config.storage.local_storage_file, "local-storage.json");
        assert_eq!(config.storage.shell_marker_var, "MLO_NATIVE_SHELL");
        assert_eq!(config.i18n.locale_key, "app-locale");
        assert_eq!(config.confirm_delete.timeout(), Duration::from_millis(3500));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn empty_documents_yield_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_json_str("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            log_filter = "mlo=debug"

            [confirm_delete]
            timeout_ms = 5000

            [i18n]
            locales_dir = "/tmp/locales"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_filter, "mlo=debug");
        assert_eq!(config.confirm_delete.timeout_ms, 5000);
        assert_eq!(config.i18n.locales_dir, Some(PathBuf::from("/tmp/locales")));
        assert_eq!(config.i18n.locale_key, "app-locale");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let mut config = AppConfig::default();
        config.data_dir = Some(PathBuf::from("data"));
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(AppConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut config = AppConfig::default();
        config.confirm_delete.timeout_ms = 0;
        config.i18n.locale_key = " ".into();
        config.storage.local_storage_file = "settings.json".into();
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn parse_errors_are_typed() {
        assert!(matches!(
            AppConfig::from_toml_str("log_filter = ["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str("{\"log_filter\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_picks_format_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("mlo.json");
        std::fs::write(&json, r#"{"confirm_delete": {"timeout_ms": 1000}}"#).unwrap();
        assert_eq!(AppConfig::load(&json).unwrap().confirm_delete.timeout_ms, 1000);

        let toml = dir.path().join("mlo.toml");
        std::fs::write(&toml, "[confirm_delete]\ntimeout_ms = 0\n").unwrap();
        assert!(matches!(AppConfig::load(&toml), Err(ConfigError::Validation(_))));

        assert!(matches!(
            AppConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
