//! Error types for the replay engine and control surface.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, replaying or serving a trace.
#[derive(Debug, Error)]
pub enum Error {
    /// Generator or input error
    #[error(transparent)]
    Steps(#[from] algoviz_steps::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid request
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Steps(_) => "INVALID_INPUT",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Io(_) => "IO",
            Error::Config(_) => "CONFIG",
            Error::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}
