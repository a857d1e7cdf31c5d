//! Translation engine: per-locale bundles with fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback terminates**: a lookup tries the requested locale, then the
//!    fallback locale, exactly once each.
//! 2. **Missing keys echo**: [`TranslationEngine::translate`] returns the key
//!    itself when no locale provides it. Callers detect "missing" by
//!    comparing the result to the key.
//! 3. **Single-pass interpolation**: `{name}` tokens are replaced once;
//!    substituted values are never rescanned. Unknown tokens stay as-is.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in active or fallback bundle | Returns the key |
//! | Locale not registered | No bundle for active locale | Falls through to fallback |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Unclosed brace | `{name` at end of text | Emitted verbatim |

use std::collections::BTreeMap;

use crate::bundle::MessageBundle;
use crate::locale::SupportedLocale;
use crate::plural::{PluralForms, PluralRule};

/// Message bundles keyed by locale, with an active and a fallback locale.
///
/// # Example
///
/// ```
/// use mlo_i18n::{MessageBundle, SupportedLocale, TranslationEngine};
///
/// let mut en = MessageBundle::new();
/// en.insert("pages.settings.language.current", "Current language: {language}");
/// en.insert("pages.priority.list.count", "{count} keyword | {count} keywords");
///
/// let mut engine = TranslationEngine::new(SupportedLocale::En, SupportedLocale::En);
/// engine.register(SupportedLocale::En, en);
///
/// assert_eq!(
///     engine.translate("pages.settings.language.current", &[("language", "English")]),
///     "Current language: English"
/// );
/// assert_eq!(engine.translate_plural("pages.priority.list.count", 1, &[]), "1 keyword");
/// assert_eq!(engine.translate("no.such.key", &[]), "no.such.key");
/// ```
#[derive(Debug, Clone)]
pub struct TranslationEngine {
    bundles: BTreeMap<SupportedLocale, MessageBundle>,
    locale: SupportedLocale,
    fallback: SupportedLocale,
}

impl TranslationEngine {
    /// Create an engine with no bundles.
    #[must_use]
    pub fn new(locale: SupportedLocale, fallback: SupportedLocale) -> Self {
        Self {
            bundles: BTreeMap::new(),
            locale,
            fallback,
        }
    }

    /// Register (or replace) the bundle for `locale`.
    pub fn register(&mut self, locale: SupportedLocale, bundle: MessageBundle) {
        self.bundles.insert(locale, bundle);
    }

    /// Whether a bundle is registered for `locale`.
    #[must_use]
    pub fn has_locale(&self, locale: SupportedLocale) -> bool {
        self.bundles.contains_key(&locale)
    }

    /// Registered locales, in tag order.
    #[must_use]
    pub fn locales(&self) -> Vec<SupportedLocale> {
        self.bundles.keys().copied().collect()
    }

    #[must_use]
    pub fn bundle(&self, locale: SupportedLocale) -> Option<&MessageBundle> {
        self.bundles.get(&locale)
    }

    #[must_use]
    pub fn locale(&self) -> SupportedLocale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: SupportedLocale) {
        self.locale = locale;
    }

    #[must_use]
    pub fn fallback(&self) -> SupportedLocale {
        self.fallback
    }

    /// Raw message for `key` and the locale it came from.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<(SupportedLocale, &str)> {
        if let Some(msg) = self.lookup_in(self.locale, key) {
            return Some((self.locale, msg));
        }
        if self.fallback == self.locale {
            return None;
        }
        self.lookup_in(self.fallback, key)
            .map(|msg| (self.fallback, msg))
    }

    fn lookup_in(&self, locale: SupportedLocale, key: &str) -> Option<&str> {
        self.bundles.get(&locale).and_then(|b| b.get(key))
    }

    /// Whether any locale in the chain provides `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Look up `key` and interpolate `args`. Returns `key` when missing.
    ///
    /// A `|`-separated plural message yields its last ("other") form; use
    /// [`Self::translate_plural`] to select by count.
    #[must_use]
    pub fn translate(&self, key: &str, args: &[(&str, &str)]) -> String {
        match self.lookup(key) {
            Some((_, template)) if template.contains('|') => {
                interpolate(PluralForms::parse(template).other(), args)
            }
            Some((_, template)) => interpolate(template, args),
            None => key.to_string(),
        }
    }

    /// Choose a plural form for `count`, then interpolate `args` plus
    /// `{count}`. Returns `key` when missing.
    #[must_use]
    pub fn translate_plural(&self, key: &str, count: i64, args: &[(&str, &str)]) -> String {
        let Some((locale, message)) = self.lookup(key) else {
            return key.to_string();
        };
        let rule = PluralRule::for_locale(locale.tag());
        let template = PluralForms::parse(message).select(rule, count);
        let count_str = count.to_string();
        let mut all_args: Vec<(&str, &str)> = vec![("count", &count_str)];
        all_args.extend_from_slice(args);
        interpolate(template, &all_args)
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Every key across registered bundles, sorted and deduplicated.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bundles.values().flat_map(MessageBundle::keys).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Keys from `reference` that `locale`'s own bundle lacks.
    #[must_use]
    pub fn missing_keys(&self, locale: SupportedLocale, reference: &[String]) -> Vec<String> {
        let bundle = self.bundles.get(&locale);
        let mut missing: Vec<String> = reference
            .iter()
            .filter(|key| bundle.and_then(|b| b.get(key)).is_none())
            .cloned()
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Per-locale coverage relative to the union of all keys.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_keys();
        let total = all.len();
        let locales = self
            .bundles
            .keys()
            .map(|&locale| {
                let missing = self.missing_keys(locale, &all);
                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale,
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();
        CoverageReport {
            total_keys: total,
            locales,
        }
    }
}

/// Coverage of every registered locale.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    #[must_use]
    pub fn for_locale(&self, locale: SupportedLocale) -> Option<&LocaleCoverage> {
        self.locales.iter().find(|c| c.locale == locale)
    }
}

/// Coverage of a single locale.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: SupportedLocale,
    pub present: usize,
    /// Keys other locales have and this one lacks.
    pub missing: Vec<String>,
    /// 0.0 to 100.0.
    pub coverage_percent: f32,
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }
        let mut token = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            token.push(c);
        }

        if !found_close {
            result.push('{');
            result.push_str(&token);
        } else if let Some(&(_, value)) = args.iter().find(|&&(name, _)| name == token) {
            result.push_str(value);
        } else {
            result.push('{');
            result.push_str(&token);
            result.push('}');
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(value: serde_json::Value) -> MessageBundle {
        MessageBundle::from_value(value).unwrap()
    }

    fn engine() -> TranslationEngine {
        let mut engine = TranslationEngine::new(SupportedLocale::ZhCn, SupportedLocale::En);
        engine.register(
            SupportedLocale::En,
            bundle(json!({
                "common": {"actions": {"save": "Save", "add": "Add"}},
                "pages": {"favorites": {"item": {"filesCount": "{count} file | {count} files"}}},
                "greet": "Hello, {name}!"
            })),
        );
        engine.register(
            SupportedLocale::ZhCn,
            bundle(json!({
                "common": {"actions": {"save": "保存"}},
                "pages": {"favorites": {"item": {"filesCount": "{count} 个文件"}}}
            })),
        );
        engine
    }

    #[test]
    fn plain_lookup_of_plural_message_uses_other_form() {
        let mut engine = engine();
        engine.set_locale(SupportedLocale::En);
        assert_eq!(
            engine.translate("pages.favorites.item.filesCount", &[("count", "n")]),
            "n files"
        );
        engine.set_locale(SupportedLocale::ZhCn);
        assert_eq!(
            engine.translate("pages.favorites.item.filesCount", &[("count", "3")]),
            "3 个文件"
        );
    }

    #[test]
    fn active_locale_first() {
        assert_eq!(engine().translate("common.actions.save", &[]), "保存");
    }

    #[test]
    fn falls_back_to_fallback_locale() {
        assert_eq!(engine().translate("common.actions.add", &[]), "Add");
        assert_eq!(
            engine().lookup("common.actions.add"),
            Some((SupportedLocale::En, "Add"))
        );
    }

    #[test]
    fn missing_key_echoes() {
        let e = engine();
        assert_eq!(e.translate("nope.nothing", &[]), "nope.nothing");
        assert!(!e.contains("nope.nothing"));
        assert_eq!(e.translate_plural("nope", 3, &[]), "nope");
    }

    #[test]
    fn unregistered_active_locale_uses_fallback() {
        let mut e = TranslationEngine::new(SupportedLocale::ZhCn, SupportedLocale::En);
        e.register(SupportedLocale::En, bundle(json!({"a": "A"})));
        assert!(!e.has_locale(SupportedLocale::ZhCn));
        assert_eq!(e.translate("a", &[]), "A");
    }

    #[test]
    fn set_locale_switches_lookup() {
        let mut e = engine();
        e.set_locale(SupportedLocale::En);
        assert_eq!(e.translate("common.actions.save", &[]), "Save");
        assert_eq!(e.locale(), SupportedLocale::En);
    }

    #[test]
    fn plural_uses_rule_of_resolving_locale() {
        let mut e = engine();
        assert_eq!(e.translate_plural("pages.favorites.item.filesCount", 1, &[]), "1 个文件");
        e.set_locale(SupportedLocale::En);
        assert_eq!(e.translate_plural("pages.favorites.item.filesCount", 1, &[]), "1 file");
        assert_eq!(e.translate_plural("pages.favorites.item.filesCount", 4, &[]), "4 files");
    }

    #[test]
    fn interpolation() {
        assert_eq!(interpolate("Hello, {name}!", &[("name", "Ada")]), "Hello, Ada!");
        assert_eq!(interpolate("{a}{b}", &[("a", "1"), ("b", "2")]), "12");
        assert_eq!(interpolate("keep {unknown}", &[]), "keep {unknown}");
        assert_eq!(interpolate("open {brace", &[("brace", "x")]), "open {brace");
        assert_eq!(interpolate("", &[]), "");
    }

    #[test]
    fn interpolation_is_single_pass() {
        assert_eq!(
            interpolate("{a}", &[("a", "{b}"), ("b", "nested")]),
            "{b}"
        );
    }

    #[test]
    fn coverage_report_lists_gaps() {
        let report = engine().coverage_report();
        assert_eq!(report.total_keys, 4);
        let zh = report.for_locale(SupportedLocale::ZhCn).unwrap();
        assert_eq!(zh.present, 2);
        assert_eq!(zh.missing, vec!["common.actions.add".to_string(), "greet".to_string()]);
        let en = report.for_locale(SupportedLocale::En).unwrap();
        assert!(en.missing.is_empty());
        assert!((en.coverage_percent - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_engine_reports_full_coverage() {
        let e = TranslationEngine::new(SupportedLocale::En, SupportedLocale::En);
        let report = e.coverage_report();
        assert_eq!(report.total_keys, 0);
        assert!(report.locales.is_empty());
    }
}
