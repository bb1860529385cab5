//! 翻訳サービスの結合テスト（ファイルシステム上のロケールを使用）

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use googletest::prelude::*;
use site_i18n::config::ConfigManager;
use site_i18n::input::source::FsBundleSource;
use site_i18n::service::SessionPhase;
use site_i18n::service::metadata::{
    DEFAULT_KEYWORDS,
    DEFAULT_TITLE,
};
use site_i18n::storage::{
    FilePreferenceStore,
    PreferenceStore,
};
use site_i18n::{
    I18nError,
    Locale,
    TranslationService,
};
use tempfile::TempDir;

type SiteService = TranslationService<FsBundleSource, FilePreferenceStore>;

fn write_bundle(root: &Path, code: &str, content: &str) {
    let dir = root.join("public/locales").join(code);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("site.json"), content).unwrap();
}

fn create_site() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join(".site-i18n.json"),
        r#"{"localesDir": "public/locales", "bundleName": "site", "preloadLocales": ["en", "de"]}"#,
    )
    .unwrap();

    write_bundle(
        root,
        "en",
        r#"{
            "hero": {"title": "Reels that stop the scroll"},
            "pricing": {"starter": "Starter"},
            "meta": {"title": "CineByte", "description": "Short-form editing"}
        }"#,
    );
    write_bundle(root, "de", r#"{"hero": {"title": "Reels, die das Scrollen stoppen"}}"#);
    write_bundle(root, "ko", "{ broken json");
    temp_dir
}

/// サイト設定を読み込んでサービスを組み立てる（ページ読み込みに相当）
fn open_site(root: &Path) -> SiteService {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(root.to_path_buf())).unwrap();

    let settings = manager.get_settings();
    let source = FsBundleSource::new(settings.locales_path(root), settings.bundle_name.clone());
    let store = FilePreferenceStore::new(settings.preference_path(root));
    TranslationService::new(source, store, settings)
}

#[tokio::test]
async fn test_start_uses_ambient_language() {
    let site = create_site();
    let service = open_site(site.path());

    let locale = service.start(Some("de-DE")).await;

    assert_eq!(locale, Locale::De);
    assert_eq!(service.phase(), SessionPhase::Ready(Locale::De));
    assert_eq!(service.translate("hero.title"), "Reels, die das Scrollen stoppen");
    assert_eq!(service.translate("pricing.starter"), "pricing.starter");
    assert_eq!(service.translate_or("pricing.starter", "Starter plan"), "Starter plan");
}

#[tokio::test]
async fn test_broken_bundle_falls_back_to_english() {
    let site = create_site();
    let service = open_site(site.path());
    service.start(Some("en-US")).await;

    service.change_language("ko").await.unwrap();

    assert_eq!(service.locale(), Locale::Ko);
    assert_eq!(service.translate("pricing.starter"), "Starter");
}

#[tokio::test]
async fn test_choice_survives_reload() {
    let site = create_site();
    let service = open_site(site.path());
    service.start(None).await;

    service.change_language("ja").await.unwrap();

    let stored = FilePreferenceStore::new(site.path().join(".site-i18n/language")).load().unwrap();
    assert_that!(stored, some(eq("ja")));

    let reloaded = open_site(site.path());
    let locale = reloaded.start(Some("de-DE")).await;

    assert_eq!(locale, Locale::Ja);
    // ja のバンドルは存在しないので英語が表示される
    assert_eq!(reloaded.translate("hero.title"), "Reels that stop the scroll");
}

#[tokio::test]
async fn test_unsupported_locale_is_rejected() {
    let site = create_site();
    let service = open_site(site.path());
    service.start(Some("de")).await;

    let result = service.change_language("pt-BR").await;

    assert!(matches!(result, Err(I18nError::UnsupportedLocale(code)) if code == "pt-BR"));
    assert_eq!(service.locale(), Locale::De);
    assert!(!site.path().join(".site-i18n/language").exists());
}

#[tokio::test]
async fn test_localized_metadata() {
    let site = create_site();
    let service = open_site(site.path());

    let en = service.localized_metadata(Locale::En).await;
    let de = service.localized_metadata(Locale::De).await;

    assert_that!(en.title, eq("CineByte"));
    assert_that!(en.description, eq("Short-form editing"));
    assert_that!(en.keywords, eq(DEFAULT_KEYWORDS));
    assert_that!(de.title, eq(DEFAULT_TITLE));
}

#[tokio::test]
async fn test_preload_warms_configured_locales() {
    let site = create_site();
    let service = open_site(site.path());

    service.preload(&[Locale::En, Locale::De, Locale::Ko]).await;

    assert!(service.is_cached(Locale::En).await);
    assert!(service.is_cached(Locale::De).await);
    assert!(!service.is_cached(Locale::Ko).await);
}
