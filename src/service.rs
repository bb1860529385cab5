//! Translation service: session state, bundle cache and locale detection.

pub mod cache;
pub mod detect;
pub mod metadata;
pub mod state;
mod translation_service;

pub use cache::TranslationCache;
pub use detect::{
    ambient_language_tag,
    detect_initial_locale,
};
pub use metadata::LocalizedMetadata;
pub use state::SessionPhase;
pub use translation_service::TranslationService;
