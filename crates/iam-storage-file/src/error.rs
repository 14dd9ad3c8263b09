//! Snapshot loading errors.

use std::io;
use std::path::Path;

use iam_model::ModelError;
use iam_storage::StorageError;

/// Converts a file read failure to a storage error.
pub fn from_io_error(path: &Path, err: &io::Error) -> StorageError {
    StorageError::Unavailable(format!("failed to read {}: {err}", path.display()))
}

/// Converts a snapshot decode failure to a storage error.
pub fn from_snapshot_error(err: &ModelError) -> StorageError {
    StorageError::malformed("ServerData", err)
}
