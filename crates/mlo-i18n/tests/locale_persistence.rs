//! End-to-end locale persistence and bundle fallback through real backends.

use std::rc::Rc;

use mlo_host::shell::{GET_APP_LOCALE, SET_APP_LOCALE_WITH_PERSISTENCE};
use mlo_host::{DetachedShell, FileLocalStorage, LocalStorage, ScriptedShell, SystemEnv};
use mlo_i18n::{
    BundlePart, DirSource, EmbeddedSource, HostServices, LOCALE_STORAGE_KEY, Layered,
    LocaleRegistry, Page, SupportedLocale, Translator,
};
use serde_json::json;

fn file_host(dir: &std::path::Path, language: &str) -> HostServices {
    HostServices {
        local: Rc::new(FileLocalStorage::new(dir.join("local-storage.json"))),
        shell: Rc::new(DetachedShell),
        env: Rc::new(SystemEnv::with_language(language)),
    }
}

#[test]
fn last_activation_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let registry = LocaleRegistry::new(file_host(dir.path(), "zh-CN"), EmbeddedSource);
        registry.initialize_locale();
        registry.set_active_locale("en").unwrap();
        registry.set_active_locale("zh-CN").unwrap();
        registry.set_active_locale("en").unwrap();
    }

    let registry = LocaleRegistry::new(file_host(dir.path(), "zh-CN"), EmbeddedSource);
    assert_eq!(registry.initialize_locale(), SupportedLocale::En);
    assert_eq!(registry.t("common.navigation.home", &[]), "Home");
}

#[test]
fn detect_returns_persisted_value() {
    let dir = tempfile::tempdir().unwrap();
    let local = FileLocalStorage::new(dir.path().join("local-storage.json"));
    local.set_item(LOCALE_STORAGE_KEY, "en").unwrap();

    let registry = LocaleRegistry::new(file_host(dir.path(), "zh-CN"), EmbeddedSource);
    assert_eq!(registry.detect_preferred_locale(), SupportedLocale::En);
}

#[test]
fn shell_choice_beats_local_storage() {
    let dir = tempfile::tempdir().unwrap();
    let shell = Rc::new(ScriptedShell::new());
    shell.respond(GET_APP_LOCALE, Ok(json!("zh-CN")));
    shell.respond(SET_APP_LOCALE_WITH_PERSISTENCE, Ok(json!(null)));
    let host = HostServices {
        shell: shell.clone(),
        ..file_host(dir.path(), "en")
    };
    host.local.set_item(LOCALE_STORAGE_KEY, "en").unwrap();

    let registry = LocaleRegistry::new(host.clone(), EmbeddedSource);
    assert_eq!(registry.initialize_locale(), SupportedLocale::ZhCn);
    assert_eq!(
        host.local.get_item(LOCALE_STORAGE_KEY).unwrap().as_deref(),
        Some("zh-CN")
    );
    assert_eq!(
        shell.calls_to(SET_APP_LOCALE_WITH_PERSISTENCE),
        vec![json!({"locale": "zh-CN"})]
    );
}

#[test]
fn override_directory_layers_over_embedded_bundles() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = DirSource::new(dir.path().join("locales"));
    let path = overrides.path_for(SupportedLocale::En, BundlePart::Page(Page::Home));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"pages":{"home":{"title":"Find Torrents"}}}"#).unwrap();

    let registry = LocaleRegistry::new(
        file_host(dir.path(), "en"),
        Layered::new(overrides, EmbeddedSource),
    );
    registry.set_active_locale("en").unwrap();
    assert_eq!(registry.t("pages.home.title", &[]), "Find Torrents");
    assert_eq!(registry.t("common.actions.save", &[]), "Save");
}

#[test]
fn broken_override_falls_back_to_english() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = DirSource::new(dir.path().join("locales"));
    let path = overrides.path_for(SupportedLocale::ZhCn, BundlePart::Common);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    let registry = LocaleRegistry::new(
        file_host(dir.path(), "zh-CN"),
        Layered::new(overrides, EmbeddedSource),
    );
    registry.set_active_locale("zh-CN").unwrap();

    assert_eq!(registry.current_locale(), SupportedLocale::ZhCn);
    assert_eq!(registry.t("common.actions.save", &[]), "Save");
}

#[test]
fn missing_everything_yields_key_echo() {
    let dir = tempfile::tempdir().unwrap();
    let registry = LocaleRegistry::new(
        file_host(dir.path(), "zh-CN"),
        DirSource::new(dir.path().join("nowhere")),
    );
    registry.set_active_locale("zh-CN").unwrap();
    assert_eq!(registry.t("common.actions.save", &[]), "common.actions.save");
    assert_eq!(
        registry.safe_translate("common.actions.save", "Save", &[]),
        "Save"
    );
}
