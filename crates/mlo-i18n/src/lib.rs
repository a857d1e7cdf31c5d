#![forbid(unsafe_code)]

//! Internationalization for the Magnetlink Optimizer front-end.
//!
//! - [`SupportedLocale`]: the closed set of shipped locales.
//! - [`MessageBundle`]: nested message trees with deep merge.
//! - [`BundleLoader`]: assembles a locale's bundle from its parts, falling
//!   back to English when a part fails.
//! - [`TranslationEngine`]: lookup with fallback, `{name}` interpolation,
//!   `|`-separated plural forms, coverage reports.
//! - [`LocaleRegistry`]: detects, activates, and persists the user's locale
//!   through the host services in `mlo-host`.
//! - [`Translator`]: `t`, `plural`, `safe_translate`, `translate_html`.
//! - [`format`]: file sizes, percentages, relative times.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use mlo_host::{DetachedShell, MemoryLocalStorage, SystemEnv};
//! use mlo_i18n::{EmbeddedSource, HostServices, LocaleRegistry, SupportedLocale, Translator};
//!
//! let host = HostServices {
//!     local: Rc::new(MemoryLocalStorage::new()),
//!     shell: Rc::new(DetachedShell),
//!     env: Rc::new(SystemEnv::with_language("en-US")),
//! };
//! let registry = LocaleRegistry::new(host, EmbeddedSource);
//!
//! assert_eq!(registry.initialize_locale(), SupportedLocale::En);
//! assert_eq!(registry.t("common.actions.save", &[]), "Save");
//! ```

pub mod bundle;
pub mod engine;
pub mod error;
pub mod format;
pub mod loader;
pub mod locale;
pub mod observable;
pub mod plural;
pub mod registry;
pub mod source;
pub mod translator;

#[cfg(test)]
mod test_support;

pub use bundle::{MessageBundle, deep_merge};
pub use engine::{CoverageReport, LocaleCoverage, TranslationEngine, interpolate};
pub use error::I18nError;
pub use loader::{BundleLoader, LoadedBundle};
pub use locale::{AVAILABLE_LANGUAGES, LanguageInfo, SupportedLocale, language_info};
pub use observable::{Observable, Subscription};
pub use plural::{PluralCategory, PluralForms, PluralRule};
pub use registry::{HostServices, LOCALE_STORAGE_KEY, LocaleRegistry};
pub use source::{BundlePart, BundleSource, Component, DirSource, EmbeddedSource, Layered, Page};
pub use translator::{KeyEcho, TranslationParams, Translator};
