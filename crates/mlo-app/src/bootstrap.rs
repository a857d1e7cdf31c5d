//! Application bootstrap.
//!
//! [`bootstrap`] wires i18n into a [`UiApp`] and mounts it. The sequence is
//! fixed: build the registry, preload and detect ([`LocaleRegistry::setup`]),
//! resolve the startup locale ([`LocaleRegistry::initialize_locale`]),
//! install the registry into the app, then mount.
//!
//! # Invariants
//!
//! 1. The app is mounted exactly once, whether or not i18n came up.
//! 2. An i18n failure is logged at `error` on `mlo.app` and reported as
//!    [`BootMode::Degraded`]; it never aborts startup.
//! 3. A degraded app renders keys verbatim ([`KeyEcho`]).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No data directory | Platform has no config dir and none configured | Degraded mount |
//! | Data directory not creatable | Permissions, read-only FS | Degraded mount |
//! | Plugin rejected | `UiApp::install_i18n` failed | Degraded mount |

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, error, info};
use web_time::{Duration, Instant};

use mlo_host::{
    DetachedShell, EnvMarkerProbe, FileLocalStorage, JsonFileStore, LocalStorage, NativeStore,
    PersistenceAdapter, StoreError, SystemEnv,
};
use mlo_i18n::{
    DirSource, EmbeddedSource, HostServices, KeyEcho, Layered, LocaleRegistry, SupportedLocale,
    Translator,
};

use crate::config::AppConfig;
use crate::confirm_delete::{ConfirmDelete, SystemClock};
use crate::error::BootstrapError;

/// Selector the application root is mounted on.
pub const MOUNT_POINT: &str = "#app";

/// The UI application being bootstrapped.
pub trait UiApp {
    /// Make the registry available to every view.
    fn install_i18n(&mut self, registry: Rc<LocaleRegistry>) -> Result<(), BootstrapError>;

    /// Attach the application to the element matching `selector`.
    fn mount(&mut self, selector: &str);
}

/// How the application came up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootMode {
    Translated { locale: SupportedLocale },
    Degraded { reason: String },
}

#[derive(Debug, Clone)]
pub struct BootReport {
    pub mode: BootMode,
    pub mount_point: &'static str,
    pub elapsed: Duration,
}

impl BootReport {
    #[must_use]
    pub fn locale(&self) -> Option<SupportedLocale> {
        match self.mode {
            BootMode::Translated { locale } => Some(locale),
            BootMode::Degraded { .. } => None,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, BootMode::Degraded { .. })
    }
}

impl fmt::Display for BootReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            BootMode::Translated { locale } => write!(f, "mounted on {} ({})", self.mount_point, locale.tag())?,
            BootMode::Degraded { reason } => {
                write!(f, "mounted on {} without translations: {reason}", self.mount_point)?;
            }
        }
        write!(f, " in {:.1?}", self.elapsed)
    }
}

/// Bring up i18n, install it into `app`, and mount.
pub fn bootstrap<A, F>(app: &mut A, setup: F) -> BootReport
where
    A: UiApp + ?Sized,
    F: FnOnce() -> Result<Rc<LocaleRegistry>, BootstrapError>,
{
    let start = Instant::now();
    let mode = match install(app, setup) {
        Ok(locale) => BootMode::Translated { locale },
        Err(err) => {
            error!(target: "mlo.app", error = %err, "failed to initialize i18n, mounting without translations");
            BootMode::Degraded {
                reason: err.to_string(),
            }
        }
    };
    app.mount(MOUNT_POINT);
    let report = BootReport {
        mode,
        mount_point: MOUNT_POINT,
        elapsed: start.elapsed(),
    };
    info!(
        target: "mlo.app",
        locale = report.locale().map(SupportedLocale::tag),
        degraded = report.is_degraded(),
        elapsed_us = report.elapsed.as_micros() as u64,
        "application mounted"
    );
    report
}

fn install<A, F>(app: &mut A, setup: F) -> Result<SupportedLocale, BootstrapError>
where
    A: UiApp + ?Sized,
    F: FnOnce() -> Result<Rc<LocaleRegistry>, BootstrapError>,
{
    let registry = setup()?;
    registry.setup();
    let locale = registry.initialize_locale();
    app.install_i18n(Rc::clone(&registry))?;
    debug!(target: "mlo.app", locale = locale.tag(), "i18n installed");
    Ok(locale)
}

// ---------------------------------------------------------------------------
// Host wiring
// ---------------------------------------------------------------------------

/// File-backed host services built from the configuration.
#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    data_dir: PathBuf,
    host: HostServices,
    store: PersistenceAdapter,
}

impl AppContext {
    /// Build the host services under `data_dir`, creating it if needed.
    ///
    /// `language` overrides the system language signal.
    pub fn new(
        config: AppConfig,
        data_dir: impl Into<PathBuf>,
        language: Option<&str>,
    ) -> Result<Self, BootstrapError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|source| BootstrapError::CreateDataDir {
            path: data_dir.clone(),
            source,
        })?;

        let local: Rc<dyn LocalStorage> = Rc::new(FileLocalStorage::new(
            data_dir.join(&config.storage.local_storage_file),
        ));
        let env = match language {
            Some(tag) => SystemEnv::with_language(tag),
            None => SystemEnv::new(),
        };
        let host = HostServices {
            local: Rc::clone(&local),
            shell: Rc::new(DetachedShell),
            env: Rc::new(env),
        };

        let store_path = data_dir.join(&config.storage.native_store_file);
        let store = PersistenceAdapter::new(
            EnvMarkerProbe::new(config.storage.shell_marker_var.clone()),
            Box::new(move || -> Result<Box<dyn NativeStore>, StoreError> {
                Ok(Box::new(JsonFileStore::open(store_path.clone())?))
            }),
            local,
        );

        debug!(target: "mlo.app", data_dir = %data_dir.display(), "host services ready");
        Ok(Self {
            config,
            data_dir,
            host,
            store,
        })
    }

    /// Resolve the data directory (`explicit`, then config, then platform
    /// default) and build the context.
    pub fn from_config(
        config: AppConfig,
        explicit_dir: Option<&Path>,
        language: Option<&str>,
    ) -> Result<Self, BootstrapError> {
        let data_dir = explicit_dir
            .map(Path::to_path_buf)
            .or_else(|| config.resolved_data_dir())
            .ok_or(BootstrapError::DataDir)?;
        Self::new(config, data_dir, language)
    }

    /// A fresh locale registry over these host services.
    ///
    /// Bundles come from `i18n.locales_dir` layered over the embedded set
    /// when configured, otherwise from the embedded set alone.
    #[must_use]
    pub fn registry(&self) -> LocaleRegistry {
        let host = self.host.clone();
        let registry = match &self.config.i18n.locales_dir {
            Some(dir) => LocaleRegistry::new(host, Layered::new(DirSource::new(dir), EmbeddedSource)),
            None => LocaleRegistry::new(host, EmbeddedSource),
        };
        registry.with_storage_key(self.config.i18n.locale_key.clone())
    }

    /// A confirm-delete gesture using the configured timeout.
    pub fn confirm_delete<T, E>(
        &self,
        action: impl FnMut(&T) -> Result<(), E> + 'static,
    ) -> ConfirmDelete<T, E>
    where
        T: PartialEq + Clone + fmt::Debug,
    {
        ConfirmDelete::with_clock(action, self.config.confirm_delete.timeout(), SystemClock)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn host(&self) -> &HostServices {
        &self.host
    }

    #[must_use]
    pub fn store(&self) -> &PersistenceAdapter {
        &self.store
    }
}

// ---------------------------------------------------------------------------
// Headless application
// ---------------------------------------------------------------------------

/// Navigation entries shown in the sidebar, in order.
pub const NAVIGATION_KEYS: [&str; 5] = [
    "common.navigation.home",
    "common.navigation.favorites",
    "common.navigation.engines",
    "common.navigation.priority",
    "common.navigation.settings",
];

/// An application without a renderer. Records what it was given so the
/// binary and tests can inspect the mounted state.
#[derive(Debug, Default)]
pub struct HeadlessApp {
    registry: Option<Rc<LocaleRegistry>>,
    mounted_at: Option<String>,
}

impl HeadlessApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn registry(&self) -> Option<&Rc<LocaleRegistry>> {
        self.registry.as_ref()
    }

    #[must_use]
    pub fn mounted_at(&self) -> Option<&str> {
        self.mounted_at.as_deref()
    }

    /// The installed registry, or [`KeyEcho`] when none was installed.
    #[must_use]
    pub fn translator(&self) -> &dyn Translator {
        match &self.registry {
            Some(registry) => registry.as_ref(),
            None => &KeyEcho,
        }
    }

    /// What the mounted shell would render.
    #[must_use]
    pub fn summary(&self) -> MountSummary {
        let t = self.translator();
        MountSummary {
            mount_point: self.mounted_at.clone(),
            locale: self.registry.as_ref().map(|r| r.current_locale()),
            title: t.t("pages.home.title", &[]),
            navigation: NAVIGATION_KEYS.iter().map(|key| t.t(key, &[])).collect(),
        }
    }
}

impl UiApp for HeadlessApp {
    fn install_i18n(&mut self, registry: Rc<LocaleRegistry>) -> Result<(), BootstrapError> {
        if self.registry.is_some() {
            return Err(BootstrapError::plugin("i18n already installed"));
        }
        self.registry = Some(registry);
        Ok(())
    }

    fn mount(&mut self, selector: &str) {
        debug!(target: "mlo.app", selector, "headless mount");
        self.mounted_at = Some(selector.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSummary {
    pub mount_point: Option<String>,
    pub locale: Option<SupportedLocale>,
    pub title: String,
    pub navigation: Vec<String>,
}

impl fmt::Display for MountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mount:    {}", self.mount_point.as_deref().unwrap_or("(not mounted)"))?;
        writeln!(
            f,
            "locale:   {}",
            self.locale.map_or("(none)", SupportedLocale::tag)
        )?;
        writeln!(f, "title:    {}", self.title)?;
        write!(f, "nav:      {}", self.navigation.join(" | "))
    }
}
