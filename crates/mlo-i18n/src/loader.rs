//! Assembles a locale's bundle from its parts.
//!
//! # Invariants
//!
//! 1. **Fixed merge order**: parts are merged in [`BundlePart::LOAD_ORDER`];
//!    a later part overrides an earlier one at the leaf level.
//! 2. **Component scoping**: only the `components` subtree of a component
//!    part is merged, and it lands under `components`.
//! 3. **Navigation chrome**: `components.navigation` and
//!    `components.languageSwitcher` keys are injected after the parts, so
//!    they are present whenever any part loaded.
//! 4. **Bounded fallback**: a failed locale falls back to
//!    [`SupportedLocale::FALLBACK`] once. If that fails too the result is an
//!    empty bundle; loading never errors.
//! 5. **Idempotent**: loading the same locale from the same source twice
//!    yields equal bundles.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Part missing | Source has no file | `warn!`, whole locale falls back |
//! | Part invalid | Not a JSON object | `warn!`, whole locale falls back |
//! | Fallback fails | Same, for the fallback locale | `warn!`, empty bundle |

use mlo_host::FallbackChain;
use tracing::{debug, warn};

use crate::bundle::MessageBundle;
use crate::error::I18nError;
use crate::locale::SupportedLocale;
use crate::source::{BundlePart, BundleSource};

/// A loaded bundle and the locale whose parts it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBundle {
    pub bundle: MessageBundle,
    /// `None` when both the requested and the fallback locale failed.
    pub resolved: Option<SupportedLocale>,
}

impl LoadedBundle {
    /// Whether the requested locale had to be substituted.
    #[must_use]
    pub fn is_fallback(&self, requested: SupportedLocale) -> bool {
        self.resolved != Some(requested)
    }
}

/// Reads parts from a [`BundleSource`] and merges them.
#[derive(Debug, Clone)]
pub struct BundleLoader<S> {
    source: S,
}

impl<S: BundleSource> BundleLoader<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Merge every part of exactly `locale`. The first failing part aborts.
    pub fn assemble(&self, locale: SupportedLocale) -> Result<MessageBundle, I18nError> {
        let mut bundle = MessageBundle::new();
        for part in BundlePart::LOAD_ORDER {
            let loaded = self.source.read(locale, part)?;
            match part {
                BundlePart::Component(_) => {
                    if let Some(components) = loaded.subtree("components") {
                        bundle.merge_at("components", components);
                    }
                }
                _ => bundle.merge(&loaded),
            }
        }
        inject_chrome(&mut bundle, locale);
        Ok(bundle)
    }

    /// Load `locale`, falling back once to [`SupportedLocale::FALLBACK`].
    pub fn load(&self, locale: SupportedLocale) -> LoadedBundle {
        let fallback = SupportedLocale::FALLBACK;
        let outcome = FallbackChain::new()
            .provider("requested", || self.assemble(locale).map(Some))
            .provider_if(locale != fallback, "fallback", || {
                self.assemble(fallback).map(Some)
            })
            .run();

        for failure in &outcome.failures {
            let tried = match failure.provider {
                "requested" => locale,
                _ => fallback,
            };
            warn!(
                target: "mlo.i18n",
                locale = tried.tag(),
                error = %failure.error,
                "failed to load locale bundle"
            );
        }

        match outcome.value {
            Some(bundle) => {
                let resolved = match outcome.provider {
                    Some("requested") => locale,
                    _ => fallback,
                };
                debug!(
                    target: "mlo.i18n",
                    requested = locale.tag(),
                    resolved = resolved.tag(),
                    keys = bundle.len(),
                    "bundle loaded"
                );
                LoadedBundle {
                    bundle,
                    resolved: Some(resolved),
                }
            }
            None => {
                warn!(
                    target: "mlo.i18n",
                    requested = locale.tag(),
                    "no bundle could be loaded, using empty messages"
                );
                LoadedBundle {
                    bundle: MessageBundle::new(),
                    resolved: None,
                }
            }
        }
    }
}

/// Navigation and language-switcher text that has no part of its own.
fn inject_chrome(bundle: &mut MessageBundle, locale: SupportedLocale) {
    let (title, menu, toggle, select, current) = match locale {
        SupportedLocale::ZhCn => ("AI 磁力助手", "菜单", "切换侧边栏", "选择语言", "当前语言"),
        SupportedLocale::En => (
            "AI Magnet Assistant",
            "Menu",
            "Toggle Sidebar",
            "Select Language",
            "Current Language",
        ),
    };
    bundle.insert("components.navigation.title", title);
    bundle.insert("components.navigation.menu", menu);
    bundle.insert("components.navigation.toggleSidebar", toggle);
    bundle.insert("components.languageSwitcher.selectLanguage", select);
    bundle.insert("components.languageSwitcher.currentLanguage", current);
}
