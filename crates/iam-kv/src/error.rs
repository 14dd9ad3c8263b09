//! Keyed store error types.

use std::fmt;

/// Keyed store operation errors.
#[derive(Debug)]
pub enum KvError {
    /// Connection to the store failed.
    Connection(String),
    /// The operation did not complete before its deadline.
    Timeout,
    /// The key holds a value of a different kind.
    WrongType(String),
    /// Invalid store configuration.
    Configuration(String),
    /// Internal store error.
    Internal(String),
}

impl KvError {
    /// Checks if the store could not be reached in time.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

impl fmt::Display for KvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "store connection error: {msg}"),
            Self::Timeout => write!(f, "store operation timed out"),
            Self::WrongType(key) => write!(f, "key '{key}' holds the wrong kind of value"),
            Self::Configuration(msg) => write!(f, "store configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "internal store error: {msg}"),
        }
    }
}

impl std::error::Error for KvError {}

/// Result type for keyed store operations.
pub type KvResult<T> = Result<T, KvError>;
