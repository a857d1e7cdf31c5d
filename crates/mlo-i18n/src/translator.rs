//! Translation helpers shared by every message consumer.
//!
//! Implementors provide [`Translator::t`] and [`Translator::plural`]; the
//! remaining helpers are derived from those two.

use crate::engine::TranslationEngine;

/// Named interpolation arguments: `&[("name", "value"), ...]`.
pub type TranslationParams<'a> = [(&'a str, &'a str)];

/// Key-based message lookup.
pub trait Translator {
    /// Translate `key` with `{name}` interpolation. A missing key yields the
    /// key itself.
    fn t(&self, key: &str, params: &TranslationParams<'_>) -> String;

    /// Translate a plural message. `count` is available as `{count}`.
    fn plural(&self, key: &str, count: i64, params: &TranslationParams<'_>) -> String;

    /// Translate `key`, or return `fallback` if the key is missing.
    fn safe_translate(&self, key: &str, fallback: &str, params: &TranslationParams<'_>) -> String {
        let translated = self.t(key, params);
        if translated == key {
            fallback.to_string()
        } else {
            translated
        }
    }

    /// Translate `key` for HTML display: newlines become `<br/>`.
    fn translate_html(&self, key: &str, params: &TranslationParams<'_>) -> String {
        self.t(key, params).replace('\n', "<br/>")
    }
}

impl Translator for TranslationEngine {
    fn t(&self, key: &str, params: &TranslationParams<'_>) -> String {
        self.translate(key, params)
    }

    fn plural(&self, key: &str, count: i64, params: &TranslationParams<'_>) -> String {
        self.translate_plural(key, count, params)
    }
}

/// Translator with no messages: every key translates to itself.
///
/// Used when the UI is mounted without i18n.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEcho;

impl Translator for KeyEcho {
    fn t(&self, key: &str, _params: &TranslationParams<'_>) -> String {
        key.to_string()
    }

    fn plural(&self, key: &str, _count: i64, _params: &TranslationParams<'_>) -> String {
        key.to_string()
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn t(&self, key: &str, params: &TranslationParams<'_>) -> String {
        (**self).t(key, params)
    }

    fn plural(&self, key: &str, count: i64, params: &TranslationParams<'_>) -> String {
        (**self).plural(key, count, params)
    }
}
