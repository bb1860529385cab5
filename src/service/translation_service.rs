//! Translation service handle.

use std::sync::{
    Arc,
    PoisonError,
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};

use futures::FutureExt;
use futures::future::{
    self,
    BoxFuture,
};
use tokio::task::JoinHandle;

use super::cache::TranslationCache;
use super::detect;
use super::metadata::LocalizedMetadata;
use super::state::{
    SessionPhase,
    SessionState,
};
use crate::config::I18nSettings;
use crate::error::{
    I18nError,
    LoadError,
};
use crate::input::bundle::Bundle;
use crate::input::source::BundleSource;
use crate::storage::PreferenceStore;
use crate::types::{
    Locale,
    LocaleInfo,
};

/// Resolves the selected locale into renderable text.
///
/// Cheap to clone; all clones share one session, one cache and one
/// preference slot. Create it once at application start and hand clones to
/// consumers.
///
/// # 読み込み失敗時の方針
/// 1. 要求ロケールのバンドル
/// 2. フォールバックロケールのバンドル（リダイレクトは 1 回のみ）
/// 3. 空のバンドル（`translate` はキーをそのまま返す）
pub struct TranslationService<S, P> {
    /// 共有状態
    inner: Arc<Inner<S, P>>,
}

/// State shared by every clone of a service
struct Inner<S, P> {
    /// Bundle loader
    source: S,
    /// Durable preference slot
    store: P,
    /// Bundles loaded so far
    cache: TranslationCache,
    /// 読み込み失敗時のリダイレクト先
    fallback: Locale,
    /// Redirect `{}` bundles of non-fallback locales to the fallback locale
    fallback_on_empty: bool,
    /// Warmed in the background by [`TranslationService::start`]
    preload_locales: Vec<Locale>,
    /// Never held across an `.await`
    state: RwLock<SessionState>,
}

impl<S, P> Clone for TranslationService<S, P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S, P> std::fmt::Debug for TranslationService<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("TranslationService")
            .field("locale", &state.locale)
            .field("phase", &state.phase)
            .field("fallback", &self.inner.fallback)
            .field("cache", &"<TranslationCache>")
            .finish_non_exhaustive()
    }
}

impl<S, P> TranslationService<S, P>
where
    S: BundleSource,
    P: PreferenceStore,
{
    /// Create an uninitialized service. Call [`Self::start`] to detect and
    /// load the initial locale.
    #[must_use]
    pub fn new(source: S, store: P, settings: &I18nSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                cache: TranslationCache::new(),
                fallback: settings.fallback_locale,
                fallback_on_empty: settings.fallback_on_empty_bundle,
                preload_locales: settings.preload_locales.clone(),
                state: RwLock::new(SessionState::new(settings.fallback_locale)),
            }),
        }
    }

    /// Saved preference, then `ambient` language tag, then the fallback.
    #[must_use]
    pub fn detect_initial_locale(&self, ambient: Option<&str>) -> Locale {
        detect::detect_initial_locale(&self.inner.store, ambient, self.inner.fallback)
    }

    /// Startup: detect the initial locale, start the background preload,
    /// and load the initial bundle.
    ///
    /// Only the first call (before any [`Self::set_locale`]) detects; later
    /// calls return the current locale.
    ///
    /// # Panics
    /// Must be called inside a tokio runtime, since the preload is spawned
    /// with [`tokio::spawn`].
    pub async fn start(&self, ambient: Option<&str>) -> Locale {
        let detected = self.detect_initial_locale(ambient);
        let token = self.write_state().start(detected);
        let Some(token) = token else {
            return self.locale();
        };
        tracing::info!(locale = %detected, "Starting translation service");

        drop(self.spawn_preload(self.inner.preload_locales.clone()));

        self.load_and_commit(token, detected).await;
        detected
    }

    /// Request a locale switch.
    ///
    /// Validation, the transition to `Loading` and persistence happen before
    /// this returns; the returned future performs the load and commits the
    /// result only if no newer request was made in the meantime. Await it or
    /// spawn it.
    ///
    /// Requesting the already selected locale returns a completed future and
    /// does not enter `Loading`.
    ///
    /// # Errors
    /// [`I18nError::UnsupportedLocale`] for codes outside the supported set.
    /// Nothing is changed or persisted in that case.
    pub fn set_locale(&self, code: &str) -> Result<BoxFuture<'static, ()>, I18nError> {
        let Some(locale) = Locale::from_code(code) else {
            tracing::warn!(code, "Ignoring unsupported locale");
            return Err(I18nError::UnsupportedLocale(code.to_string()));
        };

        let token = self.write_state().begin(locale);
        self.persist(locale);

        let Some(token) = token else {
            tracing::debug!(%locale, "Locale already selected");
            return Ok(future::ready(()).boxed());
        };
        tracing::debug!(%locale, token, "Switching locale");

        let service = self.clone();
        Ok(async move { service.load_and_commit(token, locale).await }.boxed())
    }

    /// [`Self::set_locale`] and wait for its load to settle.
    ///
    /// # Errors
    /// [`I18nError::UnsupportedLocale`] for codes outside the supported set.
    pub async fn change_language(&self, code: &str) -> Result<(), I18nError> {
        self.set_locale(code)?.await;
        Ok(())
    }

    /// Cached bundle, or fetch it with the fallback policy applied.
    ///
    /// Never fails: a broken fallback bundle degrades to the empty bundle.
    pub async fn load_bundle(&self, locale: Locale) -> Arc<Bundle> {
        if let Some(bundle) = self.inner.cache.get(locale).await {
            tracing::debug!(%locale, "Bundle cache hit");
            return bundle;
        }

        match self.fetch(locale).await {
            Ok(bundle) => self.inner.cache.insert(locale, bundle).await,
            Err(error) if locale == self.inner.fallback => {
                tracing::error!(%locale, "Failed to load fallback translations: {}", error);
                Arc::new(Bundle::empty())
            }
            Err(error) => {
                tracing::warn!(%locale, "Failed to load translations, using fallback: {}", error);
                self.load_fallback().await
            }
        }
    }

    /// Best-effort concurrent warm-up. Failures are logged by
    /// [`Self::load_bundle`] and never abort the rest of the batch.
    pub async fn preload(&self, locales: &[Locale]) {
        let loads = locales.iter().map(|&locale| self.load_bundle(locale));
        let loaded = future::join_all(loads).await;
        tracing::debug!(count = loaded.len(), "Preload finished");
    }

    /// Fire-and-forget [`Self::preload`] on the tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn_preload(&self, locales: Vec<Locale>) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move { service.preload(&locales).await })
    }

    /// `meta.*` page metadata for `locale`.
    pub async fn localized_metadata(&self, locale: Locale) -> LocalizedMetadata {
        let bundle = self.load_bundle(locale).await;
        LocalizedMetadata::from_bundle(&bundle)
    }

    /// Look up `key` in the active bundle; the raw key when missing.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.read_state().bundle.translate(key, None).to_string()
    }

    /// Look up `key` in the active bundle; `fallback` when missing.
    #[must_use]
    pub fn translate_or(&self, key: &str, fallback: &str) -> String {
        self.read_state().bundle.translate(key, Some(fallback)).to_string()
    }

    /// Most recently requested locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.read_state().locale
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.read_state().phase
    }

    /// Bundle currently used by lookups.
    #[must_use]
    pub fn active_bundle(&self) -> Arc<Bundle> {
        Arc::clone(&self.read_state().bundle)
    }

    #[must_use]
    pub fn fallback_locale(&self) -> Locale {
        self.inner.fallback
    }

    /// Supported locales with switcher display data.
    #[must_use]
    pub fn locales(&self) -> [LocaleInfo; 7] {
        Locale::ALL.map(Locale::info)
    }

    pub async fn is_cached(&self, locale: Locale) -> bool {
        self.inner.cache.contains(locale).await
    }

    /// Load `locale` and commit it under `token`
    async fn load_and_commit(&self, token: u64, locale: Locale) {
        let bundle = self.load_bundle(locale).await;
        if self.write_state().commit(token, locale, bundle) {
            tracing::debug!(%locale, token, "Locale ready");
        } else {
            tracing::debug!(%locale, token, "Discarding superseded load");
        }
    }

    /// Fallback bundle after a failed load, at most one redirect
    async fn load_fallback(&self) -> Arc<Bundle> {
        let fallback = self.inner.fallback;
        if let Some(bundle) = self.inner.cache.get(fallback).await {
            return bundle;
        }

        match self.fetch(fallback).await {
            Ok(bundle) => self.inner.cache.insert(fallback, bundle).await,
            Err(error) => {
                tracing::error!(locale = %fallback, "Failed to load fallback translations: {}", error);
                Arc::new(Bundle::empty())
            }
        }
    }

    /// Fetch from the source, rejecting empty non-fallback bundles if configured
    async fn fetch(&self, locale: Locale) -> Result<Bundle, LoadError> {
        let bundle = self.inner.source.fetch(locale).await?;
        if self.inner.fallback_on_empty && bundle.is_empty() && locale != self.inner.fallback {
            return Err(LoadError::Empty(locale));
        }
        Ok(bundle)
    }

    /// Write the locale code to the preference slot; failures only logged
    fn persist(&self, locale: Locale) {
        if let Err(error) = self.inner.store.save(locale.code()) {
            tracing::warn!(%locale, "Failed to save locale preference: {}", error);
        }
    }

    /// Write access to the session state
    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, P> TranslationService<S, P> {
    /// Read access to the session state
    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
