//! Error types for the optgate core crate.

use thiserror::Error;

/// Top-level error type for all optgate operations.
#[derive(Debug, Error)]
pub enum PrivacyError {
    #[error("opt-out status error: {0}")]
    OptOut(String),

    #[error("privacy token error: {0}")]
    Token(String),

    #[error("preference store error: {0}")]
    Prefs(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A convenience Result alias that defaults to [`PrivacyError`].
pub type Result<T> = std::result::Result<T, PrivacyError>;
