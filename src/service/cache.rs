//! Process-wide translation cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::input::bundle::Bundle;
use crate::types::Locale;

/// Append-only `Locale -> Bundle` map shared by every service handle.
///
/// Entries are never evicted; inserting a locale twice keeps the first bundle.
#[derive(Clone, Debug, Default)]
pub struct TranslationCache {
    /// ロード済みバンドル
    entries: Arc<RwLock<HashMap<Locale, Arc<Bundle>>>>,
}

impl TranslationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, locale: Locale) -> Option<Arc<Bundle>> {
        self.entries.read().await.get(&locale).cloned()
    }

    /// Insert `bundle` unless the locale is already cached, returning the
    /// cached entry either way.
    pub async fn insert(&self, locale: Locale, bundle: Bundle) -> Arc<Bundle> {
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(locale).or_insert_with(|| Arc::new(bundle)))
    }

    pub async fn contains(&self, locale: Locale) -> bool {
        self.entries.read().await.contains_key(&locale)
    }

    /// Cached locales in switcher order.
    pub async fn locales(&self) -> Vec<Locale> {
        let entries = self.entries.read().await;
        Locale::ALL.into_iter().filter(|locale| entries.contains_key(locale)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bundle(json: &str) -> Bundle {
        Bundle::from_json_str(Locale::En, json).unwrap()
    }

    #[tokio::test]
    async fn empty_cache_misses() {
        let cache = TranslationCache::new();

        assert!(cache.get(Locale::En).await.is_none());
        assert!(!cache.contains(Locale::En).await);
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let cache = TranslationCache::new();

        let first = cache.insert(Locale::De, bundle(r#"{"k": "first"}"#)).await;
        let second = cache.insert(Locale::De, bundle(r#"{"k": "second"}"#)).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.get(Locale::De).await.unwrap().get("k"), Some("first"));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = TranslationCache::new();
        let other = cache.clone();

        let _ = cache.insert(Locale::Ja, Bundle::empty()).await;
        let _ = cache.insert(Locale::En, Bundle::empty()).await;

        assert_eq!(other.locales().await, vec![Locale::En, Locale::Ja]);
    }
}
