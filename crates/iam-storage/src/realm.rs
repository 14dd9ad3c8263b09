//! Realm storage provider trait.

use async_trait::async_trait;
use iam_model::Realm;

use crate::error::StorageResult;

/// Provider for realm storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RealmProvider: Send + Sync {
    /// Gets a realm by exact name.
    ///
    /// Backends that keep membership separately return the realm without
    /// embedded members.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm doesn't exist.
    async fn get_realm(&self, name: &str) -> StorageResult<Realm>;

    /// Creates a realm from a JSON payload.
    ///
    /// Embedded clients and users are written as entities and attached to
    /// the new realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Malformed` if the payload doesn't decode and
    /// `StorageError::Duplicate` if the realm already exists.
    async fn create_realm(&self, payload: &[u8]) -> StorageResult<Realm>;

    /// Replaces the settings of an existing realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm doesn't exist and
    /// `StorageError::RenameRejected` if the payload names another realm.
    async fn update_realm(&self, name: &str, payload: &[u8]) -> StorageResult<Realm>;

    /// Deletes a realm and its membership edges.
    ///
    /// Member clients and users are left in place.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm doesn't exist.
    async fn delete_realm(&self, name: &str) -> StorageResult<()>;
}
