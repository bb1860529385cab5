//! Translation bundle definitions

use std::collections::BTreeMap;

use serde_json::{
    Map,
    Value,
};

use crate::error::LoadError;
use crate::types::Locale;

/// Key separator for nested bundle lookups (`hero.title`).
pub const KEY_SEPARATOR: char = '.';

/// Nested text-content tree for one locale.
///
/// Leaf strings are translations; objects are namespaces. Other JSON values
/// are kept as-is but never resolve as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    /// Root namespace
    root: Map<String, Value>,
}

impl Bundle {
    /// Bundle with no keys. Every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a bundle document. The root must be a JSON object.
    ///
    /// # Errors
    /// - JSON パースエラー
    /// - ルートがオブジェクトでない
    pub fn from_json_str(locale: Locale, text: &str) -> Result<Self, LoadError> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| LoadError::Parse { locale, source })?;
        Self::from_value(locale, value)
    }

    /// # Errors
    /// Returns [`LoadError::NotAnObject`] when the root is not an object.
    pub fn from_value(locale: Locale, value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(LoadError::NotAnObject(locale)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Resolve a dot-separated key to its string value.
    ///
    /// Returns `None` when a segment is missing, an intermediate value is not
    /// an object, or the final value is not a string (e.g. a namespace prefix).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut segments = key.split(KEY_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            let Value::Object(map) = current else {
                return None;
            };
            current = map.get(segment)?;
        }

        current.as_str()
    }

    /// Lookup with the display fallback policy.
    ///
    /// An explicit non-empty `fallback` wins over the raw key, so missing
    /// translations stay visible in the UI instead of rendering blank.
    #[must_use]
    pub fn translate<'a>(&'a self, key: &'a str, fallback: Option<&'a str>) -> &'a str {
        self.get(key).unwrap_or_else(|| fallback.filter(|text| !text.is_empty()).unwrap_or(key))
    }

    /// Flattened `key -> text` view of every string leaf.
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        for (key, value) in &self.root {
            flatten_value(value, key, &mut result);
        }
        result
    }
}

/// Collect string leaves under `prefix` into `result`.
///
/// Arrays and scalar non-string values are skipped since they never resolve
/// through [`Bundle::get`].
fn flatten_value(value: &Value, prefix: &str, result: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = format!("{prefix}{KEY_SEPARATOR}{key}");
                flatten_value(child, &full_key, result);
            }
        }
        Value::String(text) => {
            result.insert(prefix.to_string(), text.clone());
        }
        _ => {}
    }
}
