//! Error handling for configuration and startup.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for configuration handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration values are missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns whether the error comes from the configuration content rather
    /// than the file system.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Parse(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
