use std::collections::HashSet;
use std::path::{
    Component,
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "preloadLocales[1]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list, one error per line
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Directory holding one sub-directory per locale code.
    /// Relative paths resolve against the site root.
    pub locales_dir: PathBuf,

    /// Bundle file stem inside each locale directory.
    pub bundle_name: String,

    pub fallback_locale: Locale,

    /// Warmed in the background at startup.
    pub preload_locales: Vec<Locale>,

    /// Where the last selected locale is persisted.
    /// Relative paths resolve against the site root.
    pub preference_file: PathBuf,

    /// Treat a bundle that parses to `{}` as a failed load and redirect to
    /// the fallback locale.
    pub fallback_on_empty_bundle: bool,
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Bundle name would escape the locale directory
    /// - Duplicate preload locale
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locales_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        if self.bundle_name.is_empty() {
            errors.push(ValidationError::new(
                "bundleName",
                "The bundle name cannot be empty. Example: \"common\"",
            ));
        } else if !is_plain_file_stem(&self.bundle_name) {
            errors.push(ValidationError::new(
                "bundleName",
                format!(
                    "Invalid bundle name '{}': must be a file name without path separators",
                    self.bundle_name
                ),
            ));
        }

        let mut seen = HashSet::new();
        for (index, locale) in self.preload_locales.iter().enumerate() {
            if !seen.insert(*locale) {
                errors.push(ValidationError::new(
                    format!("preloadLocales[{index}]"),
                    format!("Duplicate locale '{locale}'"),
                ));
            }
        }

        if self.preference_file.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "preferenceFile",
                "The path cannot be empty. Example: \".site-i18n/language\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// `locales_dir` resolved against `root`.
    #[must_use]
    pub fn locales_path(&self, root: &Path) -> PathBuf {
        root.join(&self.locales_dir)
    }

    /// `preference_file` resolved against `root`.
    #[must_use]
    pub fn preference_path(&self, root: &Path) -> PathBuf {
        root.join(&self.preference_file)
    }
}

/// Single normal path component, so `<dir>/<stem>.json` stays inside `<dir>`
fn is_plain_file_stem(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            locales_dir: PathBuf::from("locales"),
            bundle_name: "common".to_string(),
            fallback_locale: Locale::FALLBACK,
            preload_locales: vec![Locale::En, Locale::De, Locale::Fr, Locale::Es],
            preference_file: PathBuf::from(".site-i18n/language"),
            fallback_on_empty_bundle: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"fallbackLocale": "de", "bundleName": "site"}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.fallback_locale, eq(Locale::De));
        assert_that!(settings.bundle_name, eq("site"));
        assert_that!(settings.preload_locales, len(eq(4)));
        assert_that!(settings.fallback_on_empty_bundle, eq(true));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: I18nSettings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings.locales_dir, PathBuf::from("locales"));
        assert_eq!(settings.preload_locales, vec![Locale::En, Locale::De, Locale::Fr, Locale::Es]);
        assert_eq!(settings.preference_file, PathBuf::from(".site-i18n/language"));
        assert_that!(settings.fallback_locale, eq(Locale::En));
    }

    #[rstest]
    fn deserialize_rejects_unsupported_fallback_locale() {
        let result = serde_json::from_str::<I18nSettings>(r#"{"fallbackLocale": "pt"}"#);

        assert_that!(result, err(displays_as(contains_substring("unknown variant"))));
    }

    #[rstest]
    fn validate_invalid_locales_dir_empty() {
        let settings = I18nSettings { locales_dir: PathBuf::new(), ..I18nSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("localesDir")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case::parent("..")]
    #[case::nested("nested/common")]
    #[case::absolute("/etc/passwd")]
    #[case::current(".")]
    fn validate_invalid_bundle_name(#[case] name: &str) {
        let settings = I18nSettings { bundle_name: name.to_string(), ..I18nSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("bundleName")),
                field!(ValidationError.message, contains_substring("Invalid bundle name"))
            ]])
        );
    }

    #[rstest]
    fn validate_duplicate_preload_locale() {
        let settings = I18nSettings {
            preload_locales: vec![Locale::En, Locale::Ja, Locale::En],
            ..I18nSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("preloadLocales[2]")),
                field!(ValidationError.message, contains_substring("'en'"))
            ]])
        );
    }

    #[rstest]
    fn resolves_paths_against_root() {
        let settings = I18nSettings::default();
        let root = Path::new("/srv/site");

        assert_eq!(settings.locales_path(root), PathBuf::from("/srv/site/locales"));
        assert_eq!(settings.preference_path(root), PathBuf::from("/srv/site/.site-i18n/language"));
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = I18nSettings {
            locales_dir: PathBuf::new(),
            bundle_name: String::new(),
            ..I18nSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. localesDir"));
        assert_that!(error_message, contains_substring("2. bundleName"));
        assert_that!(error_message, contains_substring("cannot be empty"));
    }
}
