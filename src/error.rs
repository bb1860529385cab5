//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Locale;

/// Errors surfaced by the public service API.
///
/// Bundle loading never reaches the caller as an error; only requests that
/// would corrupt the session state are rejected.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Requested code is not one of the supported locales
    #[error("Unsupported locale: '{0}'")]
    UnsupportedLocale(String),
    /// Bundle could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Defines errors that may occur while fetching a translation bundle
#[derive(Error, Debug)]
pub enum LoadError {
    /// Error when failing to read the bundle resource
    #[error("Failed to read bundle for '{locale}' at {}: {source}", .path.display())]
    Io {
        locale: Locale,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when the bundle is not valid JSON
    #[error("Failed to parse bundle for '{locale}': {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
    /// Bundle document parsed but its root is not an object
    #[error("Bundle for '{0}' is not a JSON object")]
    NotAnObject(Locale),
    /// Bundle parsed to an object with no keys
    #[error("Bundle for '{0}' has no keys")]
    Empty(Locale),
    /// No resource registered for the locale
    #[error("No bundle registered for '{0}'")]
    NotRegistered(Locale),
}

/// Errors from the durable preference slot
///
/// Never surfaced by the service: a slot that cannot be read or written is
/// logged and skipped.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access preference file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
