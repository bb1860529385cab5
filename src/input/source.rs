//! Bundle resource loaders.

use std::collections::HashMap;
use std::future::Future;
use std::path::{
    Path,
    PathBuf,
};

use crate::error::LoadError;
use crate::input::bundle::Bundle;
use crate::types::Locale;

/// Fetches the bundle resource for a locale.
///
/// Implementations only fetch; caching and fallback live in the service.
pub trait BundleSource: Send + Sync + 'static {
    /// # Errors
    /// Any failure to produce a bundle for `locale`.
    fn fetch(&self, locale: Locale) -> impl Future<Output = Result<Bundle, LoadError>> + Send;
}

/// Reads `<root>/<code>/<bundle_name>.json` from disk.
#[derive(Debug, Clone)]
pub struct FsBundleSource {
    /// ロケールディレクトリのルート
    root: PathBuf,
    /// ファイル名（拡張子なし）
    bundle_name: String,
}

impl FsBundleSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, bundle_name: impl Into<String>) -> Self {
        Self { root: root.into(), bundle_name: bundle_name.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resource path for `locale`. Only closed-set codes reach the path.
    #[must_use]
    pub fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.root.join(locale.code()).join(format!("{}.json", self.bundle_name))
    }
}

impl BundleSource for FsBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<Bundle, LoadError> {
        let path = self.bundle_path(locale);
        tracing::debug!(%locale, path = %path.display(), "Reading bundle");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io { locale, path: path.clone(), source })?;

        Bundle::from_json_str(locale, &content)
    }
}

/// Bundles embedded at build time (or registered by hand), keyed by locale.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleSource {
    /// ロケール → JSON テキスト
    documents: HashMap<Locale, String>,
}

impl StaticBundleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the JSON document for `locale`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, locale: Locale, json: impl Into<String>) -> Self {
        self.documents.insert(locale, json.into());
        self
    }

    #[must_use]
    pub fn contains(&self, locale: Locale) -> bool {
        self.documents.contains_key(&locale)
    }
}

impl BundleSource for StaticBundleSource {
    async fn fetch(&self, locale: Locale) -> Result<Bundle, LoadError> {
        let document = self.documents.get(&locale).ok_or(LoadError::NotRegistered(locale))?;
        Bundle::from_json_str(locale, document)
    }
}
