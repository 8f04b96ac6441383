//! Error types for pkgist core operations.

use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Package name is not of the form `vendor/name`.
    #[error("invalid package name '{0}': expected 'vendor/name'")]
    InvalidPackageName(String),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] sonic_rs::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
