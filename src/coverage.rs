//! 翻訳カバレッジのチェック
//!
//! フォールバックロケールのバンドルを基準に、各ロケールの不足キーと
//! 余分なキーを検出します。

use std::collections::BTreeMap;

use crate::input::bundle::Bundle;
use crate::types::Locale;

/// Key coverage of one locale against the reference (fallback) locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub locale: Locale,
    pub reference: Locale,
    /// Keys in the reference bundle with no string value in this locale
    pub missing: Vec<String>,
    /// Keys only this locale defines
    pub extra: Vec<String>,
    /// Number of keys in the reference bundle
    pub total: usize,
}

impl CoverageReport {
    /// Compare the string leaves of `bundle` with `reference_bundle`.
    ///
    /// # Examples
    /// ```
    /// use site_i18n::coverage::CoverageReport;
    /// use site_i18n::input::bundle::Bundle;
    /// use site_i18n::types::Locale;
    ///
    /// let en = Bundle::from_json_str(Locale::En, r#"{"nav": {"home": "Home", "blog": "Blog"}}"#).unwrap();
    /// let de = Bundle::from_json_str(Locale::De, r#"{"nav": {"home": "Start"}}"#).unwrap();
    ///
    /// let report = CoverageReport::compare(Locale::De, &de, Locale::En, &en);
    /// assert_eq!(report.missing, vec!["nav.blog".to_string()]);
    /// assert_eq!(report.coverage_percent(), 50);
    /// ```
    #[must_use]
    pub fn compare(
        locale: Locale,
        bundle: &Bundle,
        reference: Locale,
        reference_bundle: &Bundle,
    ) -> Self {
        let keys = bundle.flatten();
        let reference_keys = reference_bundle.flatten();

        Self {
            locale,
            reference,
            missing: keys_not_in(&reference_keys, &keys),
            extra: keys_not_in(&keys, &reference_keys),
            total: reference_keys.len(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Translated share of the reference keys, rounded down. An empty
    /// reference counts as fully covered.
    #[must_use]
    pub fn coverage_percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.total.saturating_sub(self.missing.len()) * 100 / self.total
    }
}

/// Sorted keys of `from` absent from `other`
fn keys_not_in(from: &BTreeMap<String, String>, other: &BTreeMap<String, String>) -> Vec<String> {
    from.keys().filter(|key| !other.contains_key(*key)).cloned().collect()
}
