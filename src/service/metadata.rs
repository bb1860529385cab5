//! Localized page metadata (`<title>`, description, keywords).

use serde::Serialize;

use crate::input::bundle::Bundle;

/// Default page title when `meta.title` is missing.
pub const DEFAULT_TITLE: &str = "CineByte - Professional Reel & Short-Form Video Editing Agency";

/// Default description when `meta.description` is missing.
pub const DEFAULT_DESCRIPTION: &str = "Professional reel editing agency specializing in viral \
                                       Instagram Reels, TikTok videos, and YouTube Shorts.";

/// Default keywords when `meta.keywords` is missing.
pub const DEFAULT_KEYWORDS: &str = "reel editing, instagram reels, tiktok editing, youtube shorts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

impl LocalizedMetadata {
    /// Read `meta.*` from `bundle`, defaulting each field independently.
    #[must_use]
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let field = |key: &str, default: &str| {
            bundle
                .get(key)
                .filter(|text| !text.is_empty())
                .map_or_else(|| default.to_string(), ToString::to_string)
        };

        Self {
            title: field("meta.title", DEFAULT_TITLE),
            description: field("meta.description", DEFAULT_DESCRIPTION),
            keywords: field("meta.keywords", DEFAULT_KEYWORDS),
        }
    }
}
