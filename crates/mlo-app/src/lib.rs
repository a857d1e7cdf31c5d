#![forbid(unsafe_code)]

//! Application layer for the Magnetlink Optimizer front-end.
//!
//! - [`confirm_delete`]: the two-click delete gesture shared by list views.
//! - [`config`]: TOML/JSON application configuration.
//! - [`bootstrap`]: host wiring, i18n installation, and mount.
//! - [`logging`]: the `tracing` subscriber used by the `mlo` binary.
//! - [`cli`]: the `mlo` command line.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use mlo_app::bootstrap::{AppContext, HeadlessApp, bootstrap};
//! use mlo_app::config::AppConfig;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut app = HeadlessApp::new();
//! let report = bootstrap(&mut app, || {
//!     let ctx = AppContext::new(AppConfig::default(), dir.path(), Some("zh-CN"))?;
//!     Ok(Rc::new(ctx.registry()))
//! });
//!
//! assert!(!report.is_degraded());
//! assert_eq!(app.summary().navigation[0], "首页");
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod confirm_delete;
pub mod error;
pub mod logging;

pub use bootstrap::{
    AppContext, BootMode, BootReport, HeadlessApp, MOUNT_POINT, MountSummary, UiApp, bootstrap,
};
pub use cli::{Cli, run, run_from_env};
pub use config::{AppConfig, ConfigError};
pub use confirm_delete::{
    ButtonClass, Clock, ConfirmDelete, ConfirmOutcome, DEFAULT_CONFIRM_TIMEOUT, DeleteGesture,
    ManualClock, SystemClock,
};
pub use error::{BootstrapError, CliError};
