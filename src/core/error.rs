//! Error types for the facade generator

use thiserror::Error;

/// Main error type for scene generation and export
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid entrance: {0}")]
    InvalidEntrance(String),

    #[error("Unknown signage side or position: {0:?}")]
    UnknownSide(String),

    #[error("Material conflict: {0}")]
    MaterialConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Prefix the message with the configuration path that produced it,
    /// keeping the variant. `Json` and `Io` pass through unchanged.
    pub fn context(self, path: &str) -> Self {
        match self {
            Error::InvalidDimension(m) => Error::InvalidDimension(format!("{path}: {m}")),
            Error::InvalidEntrance(m) => Error::InvalidEntrance(format!("{path}: {m}")),
            Error::UnknownSide(m) => Error::UnknownSide(format!("{path}: {m}")),
            Error::MaterialConflict(m) => Error::MaterialConflict(format!("{path}: {m}")),
            Error::Config(m) => Error::Config(format!("{path}: {m}")),
            Error::Export(m) => Error::Export(format!("{path}: {m}")),
            other => other,
        }
    }
}
