//! Error types for flashdeck

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to read '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    #[error("Malformed data under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Failed to write '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported language: {0}")]
    InvalidLanguage(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn read(key: &str, reason: impl std::fmt::Display) -> Self {
        Error::StorageRead {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn corrupt(key: &str, reason: impl std::fmt::Display) -> Self {
        Error::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl std::fmt::Display) -> Self {
        Error::StorageWrite {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the errors a user can fix by changing their input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
