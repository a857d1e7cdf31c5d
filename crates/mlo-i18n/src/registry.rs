//! The locale registry: which locale is active, where the choice is kept,
//! and the translation engine serving it.
//!
//! # Invariants
//!
//! 1. **Closed set**: only [`SupportedLocale`] values are ever activated.
//!    Unsupported tags from callers, storage, or the shell are rejected.
//! 2. **Persisted choice wins**: [`LocaleRegistry::detect_preferred_locale`]
//!    returns the stored locale whenever it is supported.
//! 3. **Load before switch**: the engine has a bundle registered for a
//!    locale before that locale is made active.
//! 4. **Last write wins**: activations apply in call order; the active
//!    locale is whatever the most recent successful activation chose.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unsupported tag | Not in the supported set | `warn!`, active locale unchanged |
//! | Local storage read fails | Backend error | `warn!`, detection continues |
//! | Local storage write fails | Backend error | `warn!`, activation continues |
//! | Shell unavailable | No native host | Detection from local state |
//! | Shell notification fails | Command error | `warn!`, activation stands |

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use mlo_host::shell;
use mlo_host::{LocalStorage, NativeShell, RuntimeEnv, ShellError};
use tracing::{debug, info, warn};
use web_time::SystemTime;

use crate::engine::{CoverageReport, TranslationEngine};
use crate::error::I18nError;
use crate::format;
use crate::loader::{BundleLoader, LoadedBundle};
use crate::locale::{AVAILABLE_LANGUAGES, LanguageInfo, SupportedLocale};
use crate::observable::{Observable, Subscription};
use crate::source::BundleSource;
use crate::translator::{TranslationParams, Translator};

/// Local-storage key holding the user's locale choice.
pub const LOCALE_STORAGE_KEY: &str = "app-locale";

/// Host services the registry talks to.
#[derive(Clone)]
pub struct HostServices {
    pub local: Rc<dyn LocalStorage>,
    pub shell: Rc<dyn NativeShell>,
    pub env: Rc<dyn RuntimeEnv>,
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}

/// Active locale, its persistence, and the engine that translates with it.
pub struct LocaleRegistry {
    host: HostServices,
    loader: BundleLoader<Box<dyn BundleSource>>,
    engine: RefCell<TranslationEngine>,
    current: Observable<SupportedLocale>,
    storage_key: String,
    _change_log: Subscription,
}

impl std::fmt::Debug for LocaleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleRegistry")
            .field("current", &self.current.get())
            .field("loaded", &self.engine.borrow().locales())
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl LocaleRegistry {
    /// Create a registry with nothing loaded and the default locale active.
    pub fn new(host: HostServices, source: impl BundleSource + 'static) -> Self {
        let current = Observable::new(SupportedLocale::DEFAULT);
        let change_log = current.subscribe(|locale: &SupportedLocale| {
            info!(target: "mlo.i18n", locale = locale.tag(), "language changed");
        });
        let source: Box<dyn BundleSource> = Box::new(source);
        Self {
            host,
            loader: BundleLoader::new(source),
            engine: RefCell::new(TranslationEngine::new(
                SupportedLocale::DEFAULT,
                SupportedLocale::FALLBACK,
            )),
            current,
            storage_key: LOCALE_STORAGE_KEY.to_string(),
            _change_log: change_log,
        }
    }

    /// Use a different local-storage key for the locale choice.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Preload every supported locale and activate the detected one.
    ///
    /// Nothing is persisted and the shell is not contacted.
    pub fn setup(&self) -> SupportedLocale {
        for locale in SupportedLocale::ALL {
            self.ensure_loaded(locale);
        }
        let detected = self.detect_preferred_locale();
        self.engine.borrow_mut().set_locale(detected);
        self.current.set(detected);
        debug!(target: "mlo.i18n", locale = detected.tag(), "i18n setup complete");
        detected
    }

    // -----------------------------------------------------------------
    // Detection
    // -----------------------------------------------------------------

    /// The persisted choice if supported, else [`Self::browser_locale`].
    pub fn detect_preferred_locale(&self) -> SupportedLocale {
        match self.host.local.get_item(&self.storage_key) {
            Ok(Some(tag)) => match SupportedLocale::parse(&tag) {
                Some(locale) => return locale,
                None => warn!(target: "mlo.i18n", tag = %tag, "ignoring unsupported stored locale"),
            },
            Ok(None) => {}
            Err(err) => {
                warn!(target: "mlo.i18n", error = %err, "failed to read stored locale");
            }
        }
        self.browser_locale()
    }

    /// Match the runtime language tag exactly, then by primary subtag, else
    /// the default locale.
    pub fn browser_locale(&self) -> SupportedLocale {
        self.host
            .env
            .language()
            .and_then(|tag| SupportedLocale::match_language(&tag))
            .unwrap_or(SupportedLocale::DEFAULT)
    }

    // -----------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------

    /// Load a locale's bundle from the source, with fallback.
    pub fn load_bundle(&self, locale: SupportedLocale) -> LoadedBundle {
        self.loader.load(locale)
    }

    fn ensure_loaded(&self, locale: SupportedLocale) {
        if self.engine.borrow().has_locale(locale) {
            return;
        }
        let loaded = self.load_bundle(locale);
        self.engine.borrow_mut().register(locale, loaded.bundle);
    }

    // -----------------------------------------------------------------
    // Activation
    // -----------------------------------------------------------------

    /// Activate the locale named by `tag`.
    ///
    /// An unsupported tag is logged and rejected; nothing changes.
    pub fn set_active_locale(&self, tag: &str) -> Result<SupportedLocale, I18nError> {
        match SupportedLocale::parse(tag) {
            Some(locale) => {
                self.activate(locale);
                Ok(locale)
            }
            None => {
                warn!(target: "mlo.i18n", tag, "unsupported locale");
                Err(I18nError::UnsupportedLocale(tag.to_string()))
            }
        }
    }

    /// Activate `locale`: load, switch, persist, update the document, and
    /// notify the shell.
    pub fn activate(&self, locale: SupportedLocale) {
        self.ensure_loaded(locale);
        self.engine.borrow_mut().set_locale(locale);
        self.current.set(locale);

        if let Err(err) = self.host.local.set_item(&self.storage_key, locale.tag()) {
            warn!(target: "mlo.i18n", error = %err, "failed to persist locale");
        }
        self.host.env.set_document_lang(locale.tag());

        match shell::set_app_locale_with_persistence(self.host.shell.as_ref(), locale.tag()) {
            Ok(()) => debug!(target: "mlo.shell", locale = locale.tag(), "shell notified of locale"),
            Err(ShellError::Unavailable) => {
                debug!(target: "mlo.shell", "no shell to notify of locale change");
            }
            Err(err) => {
                warn!(target: "mlo.shell", error = %err, "failed to notify shell of locale change");
            }
        }
    }

    /// Activate the shell's stored locale, or the detected one when the
    /// shell has none, fails, or reports an unsupported tag.
    pub fn initialize_locale(&self) -> SupportedLocale {
        match shell::get_app_locale(self.host.shell.as_ref()) {
            Ok(Some(tag)) => match SupportedLocale::parse(&tag) {
                Some(locale) => {
                    self.activate(locale);
                    return locale;
                }
                None => warn!(target: "mlo.shell", tag = %tag, "shell reported unsupported locale"),
            },
            Ok(None) => debug!(target: "mlo.shell", "shell has no stored locale"),
            Err(ShellError::Unavailable) => debug!(target: "mlo.shell", "no shell, using local settings"),
            Err(err) => {
                warn!(target: "mlo.shell", error = %err, "failed to get locale from shell, using local settings");
            }
        }
        let locale = self.detect_preferred_locale();
        self.activate(locale);
        locale
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[must_use]
    pub fn current_locale(&self) -> SupportedLocale {
        self.current.get()
    }

    /// Number of locale changes observed so far.
    #[must_use]
    pub fn locale_version(&self) -> u64 {
        self.current.version()
    }

    #[must_use]
    pub fn available_languages(&self) -> &'static [LanguageInfo] {
        &AVAILABLE_LANGUAGES
    }

    #[must_use]
    pub fn current_language_info(&self) -> &'static LanguageInfo {
        self.current.get().info()
    }

    /// Call `callback` with the new locale on every change.
    pub fn subscribe(&self, callback: impl Fn(&SupportedLocale) + 'static) -> Subscription {
        self.current.subscribe(callback)
    }

    /// Borrow the engine. Do not hold the guard across an activation.
    #[must_use]
    pub fn engine(&self) -> Ref<'_, TranslationEngine> {
        self.engine.borrow()
    }

    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        self.engine.borrow().coverage_report()
    }

    /// `then` relative to `now`, in the active locale.
    #[must_use]
    pub fn relative_time(&self, then: SystemTime, now: SystemTime) -> String {
        format::format_relative_time(then, now, self.current.get())
    }
}

impl Translator for LocaleRegistry {
    fn t(&self, key: &str, params: &TranslationParams<'_>) -> String {
        self.engine.borrow().translate(key, params)
    }

    fn plural(&self, key: &str, count: i64, params: &TranslationParams<'_>) -> String {
        self.engine.borrow().translate_plural(key, count, params)
    }
}
