//! Error types for Sonar.

use thiserror::Error;

/// Result type alias using Sonar's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Sonar.
#[derive(Error, Debug)]
pub enum Error {
    // Menu errors
    #[error("Index {index} is out of range for a menu of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    // Audio errors
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    #[error("Audio output error: {0}")]
    AudioOutput(String),

    #[error("Sound not found: {0}")]
    SoundNotFound(String),

    // Speech errors
    #[error("Speech error: {0}")]
    Speech(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error comes from an invalid menu index.
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
