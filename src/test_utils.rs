//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};

use tokio::sync::Notify;

use crate::config::I18nSettings;
use crate::error::LoadError;
use crate::input::bundle::Bundle;
use crate::input::source::{
    BundleSource,
    StaticBundleSource,
};
use crate::types::Locale;

/// テスト用のバンドル一式（en / de / fr / ja）
///
/// `only.english` は en にのみ存在する。
pub(crate) fn sample_documents() -> StaticBundleSource {
    StaticBundleSource::new()
        .with(
            Locale::En,
            r#"{
                "hero": {"title": "Reels that stop the scroll"},
                "nav": {"services": "Services", "pricing": "Pricing"},
                "only": {"english": "English only"},
                "meta": {"title": "CineByte EN"}
            }"#,
        )
        .with(
            Locale::De,
            r#"{"hero": {"title": "Reels, die das Scrollen stoppen"}, "nav": {"services": "Leistungen"}}"#,
        )
        .with(
            Locale::Fr,
            r#"{"hero": {"title": "Des reels qui arrêtent le scroll"}, "nav": {"services": "Services FR"}}"#,
        )
        .with(Locale::Ja, r#"{"hero": {"title": "スクロールを止めるリール"}}"#)
}

/// テスト用のデフォルト設定
pub(crate) fn test_settings() -> I18nSettings {
    I18nSettings::default()
}

/// 手動で解放されるまで fetch を待機させるバンドルソース
///
/// 読み込み順序を決定的に制御するために使う。
#[derive(Clone)]
pub(crate) struct GatedBundleSource {
    /// 共有状態
    inner: Arc<GatedInner>,
}

/// `GatedBundleSource` の共有状態
struct GatedInner {
    /// 実際のドキュメント
    documents: StaticBundleSource,
    /// false の場合は待機しない
    gated: bool,
    /// ロケールごとのゲート
    gates: HashMap<Locale, Notify>,
    /// ロケールごとの fetch 回数
    fetches: Mutex<HashMap<Locale, usize>>,
}

impl GatedBundleSource {
    /// `release` されるまで各 fetch を待機させる
    pub(crate) fn gated(documents: StaticBundleSource) -> Self {
        Self::build(documents, true)
    }

    /// 待機せずに即座に返す（fetch 回数の計測用）
    pub(crate) fn open(documents: StaticBundleSource) -> Self {
        Self::build(documents, false)
    }

    /// 共通の初期化
    fn build(documents: StaticBundleSource, gated: bool) -> Self {
        let gates = Locale::ALL.into_iter().map(|locale| (locale, Notify::new())).collect();
        Self {
            inner: Arc::new(GatedInner {
                documents,
                gated,
                gates,
                fetches: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// `locale` の fetch を 1 回分解放する
    pub(crate) fn release(&self, locale: Locale) {
        if let Some(gate) = self.inner.gates.get(&locale) {
            gate.notify_one();
        }
    }

    /// `locale` の fetch が呼ばれた回数
    pub(crate) fn fetch_count(&self, locale: Locale) -> usize {
        let fetches = self.inner.fetches.lock().unwrap_or_else(PoisonError::into_inner);
        fetches.get(&locale).copied().unwrap_or_default()
    }
}

impl BundleSource for GatedBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<Bundle, LoadError> {
        {
            let mut fetches = self.inner.fetches.lock().unwrap_or_else(PoisonError::into_inner);
            *fetches.entry(locale).or_default() += 1;
        }

        if self.inner.gated
            && let Some(gate) = self.inner.gates.get(&locale)
        {
            gate.notified().await;
        }

        self.inner.documents.fetch(locale).await
    }
}
