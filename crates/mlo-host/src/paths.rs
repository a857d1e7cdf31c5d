//! Per-user data locations.

use std::path::PathBuf;

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "mlo";

/// Override for the data directory (used by tests and portable installs).
pub const DATA_DIR_ENV: &str = "MLO_DATA_DIR";

/// Resolve the per-user data directory.
///
/// `MLO_DATA_DIR` wins; otherwise `<config dir>/mlo`. Returns `None` when
/// the platform reports no config directory.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}
