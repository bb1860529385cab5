//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::I18nError;

/// Supported UI language.
///
/// The set is closed: bundle resources and the stored preference are always
/// resolved through this enum, never through free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    De,
    Fr,
    Es,
    Ja,
    Ko,
    Bn,
}

/// Display metadata for a locale (language switcher entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleInfo {
    pub locale: Locale,
    /// Native language name, e.g. `Deutsch`.
    pub name: &'static str,
    /// ISO 3166 region code used for the flag icon, e.g. `jp` for Japanese.
    pub country_code: &'static str,
}

impl Locale {
    /// All supported locales in switcher order.
    pub const ALL: [Self; 7] =
        [Self::En, Self::De, Self::Fr, Self::Es, Self::Ja, Self::Ko, Self::Bn];

    /// Default locale used when nothing else resolves.
    pub const FALLBACK: Self = Self::En;

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Bn => "bn",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "Deutsch",
            Self::Fr => "Français",
            Self::Es => "Español",
            Self::Ja => "日本語",
            Self::Ko => "한국어",
            Self::Bn => "বাংলা",
        }
    }

    #[must_use]
    pub const fn country_code(self) -> &'static str {
        match self {
            Self::En => "us",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::Ja => "jp",
            Self::Ko => "kr",
            Self::Bn => "bd",
        }
    }

    #[must_use]
    pub const fn info(self) -> LocaleInfo {
        LocaleInfo { locale: self, name: self.display_name(), country_code: self.country_code() }
    }

    /// Exact code match (`"de"`). Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    /// Resolve a language tag by its primary subtag.
    ///
    /// Accepts BCP 47 tags (`de-DE`) as well as POSIX locale names
    /// (`de_DE.UTF-8`).
    ///
    /// # Examples
    /// ```
    /// use site_i18n::types::Locale;
    ///
    /// assert_eq!(Locale::from_language_tag("de-DE"), Some(Locale::De));
    /// assert_eq!(Locale::from_language_tag("ja_JP.UTF-8"), Some(Locale::Ja));
    /// assert_eq!(Locale::from_language_tag("xx-XX"), None);
    /// ```
    #[must_use]
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_', '.', '@']).next()?;
        if primary.is_empty() {
            return None;
        }
        Self::from_code(primary)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| I18nError::UnsupportedLocale(s.to_string()))
    }
}
