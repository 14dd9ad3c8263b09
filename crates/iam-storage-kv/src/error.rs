//! Keyed backend error conversion.

use iam_kv::KvError;
use iam_storage::StorageError;
use tracing::warn;

/// Converts a keyed store error to a storage error.
#[allow(clippy::needless_pass_by_value)]
pub fn from_kv_error(err: KvError) -> StorageError {
    match err {
        KvError::Connection(_) | KvError::Timeout => {
            warn!(error = %err, "Keyed store unavailable");
            StorageError::Unavailable(err.to_string())
        }
        KvError::WrongType(_) | KvError::Configuration(_) | KvError::Internal(_) => {
            StorageError::Internal(err.to_string())
        }
    }
}

/// Creates an error for a stored record that no longer decodes.
pub fn corrupt(entity_type: &'static str, key: &str, reason: impl std::fmt::Display) -> StorageError {
    StorageError::Internal(format!("stored {entity_type} at '{key}' is corrupt: {reason}"))
}
