//! Property-based invariant tests for the i18n subsystem.
//!
//! 1. Deep merge: the later bundle wins at every leaf it sets.
//! 2. Deep merge: leaves only in the earlier bundle survive.
//! 3. Deep merge is deterministic and idempotent.
//! 4. Interpolation with no placeholders is identity.
//! 5. Interpolation is single-pass (no recursive substitution).
//! 6. Missing args leave placeholder tokens intact.
//! 7. The engine echoes keys it does not know.
//! 8. `plural` always injects `{count}`.
//! 9. Locale matching never panics and only yields supported locales.
//! 10. Coverage percentages stay in [0, 100].

use mlo_i18n::{
    MessageBundle, PluralForms, PluralRule, SupportedLocale, TranslationEngine, interpolate,
};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ── Helpers ──────────────────────────────────────────────────────────

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

/// Nested string trees, two or three levels deep.
fn tree() -> impl Strategy<Value = Value> {
    let leaf = "[a-zA-Z ]{0,8}".prop_map(Value::String);
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop::collection::btree_map(segment(), inner, 1..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
    })
}

fn bundle_strategy() -> impl Strategy<Value = MessageBundle> {
    prop::collection::btree_map(segment(), tree(), 0..4).prop_map(|m| {
        MessageBundle::from_value(Value::Object(m.into_iter().collect())).unwrap()
    })
}

/// Keys (dotted paths) of every string leaf in `b`.
fn leaves(b: &MessageBundle) -> Vec<(String, String)> {
    b.keys()
        .into_iter()
        .map(|k| {
            let v = b.get(&k).unwrap().to_string();
            (k, v)
        })
        .collect()
}

/// Whether any strict prefix of `key` is a leaf in `b`.
fn shadowed_by_leaf(b: &MessageBundle, key: &str) -> bool {
    let mut prefix = String::new();
    for (i, seg) in key.split('.').enumerate() {
        if i > 0 {
            prefix.push('.');
        }
        prefix.push_str(seg);
        if prefix.len() < key.len() && b.get(&prefix).is_some() {
            return true;
        }
    }
    false
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Deep merge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn later_bundle_wins_at_leaves(a in bundle_strategy(), b in bundle_strategy()) {
        let mut merged = a.clone();
        merged.merge(&b);
        for (key, value) in leaves(&b) {
            prop_assert_eq!(merged.get(&key), Some(value.as_str()), "key {}", key);
        }
    }

    #[test]
    fn earlier_siblings_survive(a in bundle_strategy(), b in bundle_strategy()) {
        let mut merged = a.clone();
        merged.merge(&b);
        for (key, value) in leaves(&a) {
            // Survives unless `b` writes a value at the key or one of its ancestors.
            if b.get_value(&key).is_some() || shadowed_by_leaf(&b, &key) {
                continue;
            }
            prop_assert_eq!(merged.get(&key), Some(value.as_str()), "key {}", key);
        }
    }

    #[test]
    fn merge_is_deterministic_and_idempotent(a in bundle_strategy(), b in bundle_strategy()) {
        let mut first = a.clone();
        first.merge(&b);
        let mut second = a.clone();
        second.merge(&b);
        prop_assert_eq!(&first, &second);
        second.merge(&b);
        prop_assert_eq!(&first, &second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Interpolation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_placeholders_is_identity(text in "[^{}]{0,64}") {
        prop_assert_eq!(interpolate(&text, &[("name", "x")]), text);
    }

    #[test]
    fn substitution_is_single_pass(value in "[a-z{}]{0,16}") {
        let out = interpolate("<{v}>", &[("v", &value), ("a", "NOPE")]);
        prop_assert_eq!(out, format!("<{value}>"));
    }

    #[test]
    fn missing_args_keep_tokens(name in "[a-z]{1,8}") {
        let template = format!("before {{{name}}} after");
        prop_assert_eq!(interpolate(&template, &[]), template);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7-8. Engine
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_keys_echo(key in "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}") {
        let mut en = MessageBundle::new();
        en.insert("zz.known", "Known");
        let mut engine = TranslationEngine::new(SupportedLocale::En, SupportedLocale::En);
        engine.register(SupportedLocale::En, en);
        prop_assume!(key != "zz.known");
        prop_assert_eq!(engine.translate(&key, &[]), key);
    }

    #[test]
    fn plural_injects_count(count in -1000_i64..1000) {
        let mut en = MessageBundle::new();
        en.insert("n", "{count} item | {count} items");
        let mut engine = TranslationEngine::new(SupportedLocale::En, SupportedLocale::En);
        engine.register(SupportedLocale::En, en);
        let out = engine.translate_plural("n", count, &[]);
        prop_assert!(out.starts_with(&count.to_string()), "{}", out);
        prop_assert!(!out.contains("{count}"), "{}", out);
    }

    #[test]
    fn select_returns_one_of_the_forms(count in any::<i64>(), n in 1_usize..5) {
        let message: Vec<String> = (0..n).map(|i| format!("form{i}")).collect();
        let message = message.join(" | ");
        let forms = PluralForms::parse(&message);
        for rule in [PluralRule::English, PluralRule::Cjk] {
            let chosen = forms.select(rule, count);
            prop_assert!(chosen.starts_with("form"), "{}", chosen);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Locale matching
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn match_language_never_panics(tag in "\\PC{0,16}") {
        if let Some(locale) = SupportedLocale::match_language(&tag) {
            prop_assert!(SupportedLocale::ALL.contains(&locale));
        }
        let _ = PluralRule::for_locale(&tag);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coverage_percent_in_range(a in bundle_strategy(), b in bundle_strategy()) {
        let mut engine = TranslationEngine::new(SupportedLocale::ZhCn, SupportedLocale::En);
        engine.register(SupportedLocale::ZhCn, a);
        engine.register(SupportedLocale::En, b);
        let report = engine.coverage_report();
        for coverage in &report.locales {
            prop_assert!((0.0..=100.0).contains(&coverage.coverage_percent));
            prop_assert_eq!(coverage.present + coverage.missing.len(), report.total_keys);
        }
    }
}
