//! Supported locales and language metadata.
//!
//! The set is closed: anything outside it is rejected by [`SupportedLocale::parse`]
//! and never activated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;

/// A locale the application ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportedLocale {
    /// Simplified Chinese.
    #[serde(rename = "zh-CN")]
    ZhCn,
    /// English.
    #[serde(rename = "en")]
    En,
}

impl SupportedLocale {
    /// Every supported locale, in preference order for prefix matching.
    pub const ALL: [SupportedLocale; 2] = [SupportedLocale::ZhCn, SupportedLocale::En];

    /// Locale used when nothing else matches.
    pub const DEFAULT: SupportedLocale = SupportedLocale::ZhCn;

    /// Locale loaded when a requested bundle cannot be loaded.
    pub const FALLBACK: SupportedLocale = SupportedLocale::En;

    /// The BCP-47 tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::En => "en",
        }
    }

    /// Exact tag match. `"zh"` or `"en-US"` are not supported tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.tag() == tag)
    }

    /// Match a runtime language tag: exact first, then by primary subtag
    /// prefix (`"zh-TW"` → `zh-CN`, `"en-US"` → `en`).
    #[must_use]
    pub fn match_language(tag: &str) -> Option<Self> {
        if let Some(exact) = Self::parse(tag) {
            return Some(exact);
        }
        let primary = primary_subtag(tag);
        if primary.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag().starts_with(primary))
    }

    /// Display metadata for this locale.
    #[must_use]
    pub fn info(self) -> &'static LanguageInfo {
        match self {
            Self::ZhCn => &AVAILABLE_LANGUAGES[0],
            Self::En => &AVAILABLE_LANGUAGES[1],
        }
    }
}

impl fmt::Display for SupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SupportedLocale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| I18nError::UnsupportedLocale(s.to_string()))
    }
}

/// Text before the first `-` or `_`.
#[must_use]
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or("")
}

/// Metadata for an arbitrary tag. Tags outside the supported set get the
/// default locale's entry.
#[must_use]
pub fn language_info(tag: &str) -> &'static LanguageInfo {
    SupportedLocale::parse(tag)
        .unwrap_or(SupportedLocale::DEFAULT)
        .info()
}

/// Display metadata for a language switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: SupportedLocale,
    /// English name.
    pub name: &'static str,
    /// Name in the language itself.
    pub native_name: &'static str,
    pub flag: &'static str,
}

/// Languages offered by the switcher, in display order.
pub const AVAILABLE_LANGUAGES: [LanguageInfo; 2] = [
    LanguageInfo {
        code: SupportedLocale::ZhCn,
        name: "Chinese",
        native_name: "简体中文",
        flag: "🇨🇳",
    },
    LanguageInfo {
        code: SupportedLocale::En,
        name: "English",
        native_name: "English",
        flag: "🇺🇸",
    },
];
