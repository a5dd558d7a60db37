//! Error handling for the enginegen library.
//!
//! Defines the main error type `Error` used throughout the library, along
//! with a convenient `Result` type alias. Structural per-entry schema
//! problems are logged and skipped at the ingestion site rather than
//! surfaced here; this enum covers the failures that abort a stage.

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Overlay merge error
    #[error("Overlay merge error: {0}")]
    Merge(String),

    /// Schema ingestion error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Service ingestion error
    #[error("Service error: {0}")]
    Service(String),

    /// Emission error
    #[error("Emission error: {0}")]
    Emit(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new overlay merge error
    pub fn merge<S: Into<String>>(msg: S) -> Self {
        Self::Merge(msg.into())
    }

    /// Create a new schema ingestion error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new service ingestion error
    pub fn service<S: Into<String>>(msg: S) -> Self {
        Self::Service(msg.into())
    }

    /// Create a new emission error
    pub fn emit<S: Into<String>>(msg: S) -> Self {
        Self::Emit(msg.into())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
