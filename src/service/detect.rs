//! Initial locale detection.

use crate::storage::PreferenceStore;
use crate::types::Locale;

/// Environment variables consulted for the ambient language, in priority order.
const LANGUAGE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// 起動時のロケールを決定する
///
/// 優先順位:
/// 1. 保存済みの設定（サポート対象の場合）
/// 2. 環境の言語タグのプライマリサブタグ（サポート対象の場合）
/// 3. `fallback`
///
/// Never fails: unreadable storage is logged and skipped.
pub fn detect_initial_locale<P>(store: &P, ambient: Option<&str>, fallback: Locale) -> Locale
where
    P: PreferenceStore + ?Sized,
{
    match store.load() {
        Ok(Some(saved)) => {
            if let Some(locale) = Locale::from_code(&saved) {
                tracing::debug!(%locale, "Using saved locale");
                return locale;
            }
            tracing::debug!(saved = %saved, "Ignoring unsupported saved locale");
        }
        Ok(None) => {}
        Err(error) => tracing::warn!("Failed to read saved locale: {}", error),
    }

    if let Some(locale) = ambient.and_then(Locale::from_language_tag) {
        tracing::debug!(%locale, "Using ambient language");
        return locale;
    }

    fallback
}

/// Ambient language tag of the process environment.
#[must_use]
pub fn ambient_language_tag() -> Option<String> {
    first_language_tag(|name| std::env::var(name).ok())
}

/// First non-empty value among [`LANGUAGE_ENV_VARS`]
fn first_language_tag(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    LANGUAGE_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}
