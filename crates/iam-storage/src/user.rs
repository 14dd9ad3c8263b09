//! User storage provider trait.

use async_trait::async_trait;
use iam_model::User;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Gets a user by username.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn get_user(&self, name: &str) -> StorageResult<User>;

    /// Gets a user that is a member of the realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm or user doesn't exist,
    /// or `StorageError::NotMember` if the realm doesn't list it.
    async fn get_user_from_realm(&self, realm: &str, name: &str) -> StorageResult<User>;

    /// Gets a realm member by user id.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFoundById` if no member has this id.
    async fn get_user_from_realm_by_id(&self, realm: &str, id: Uuid) -> StorageResult<User>;

    /// Gets every user of a realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown realm and
    /// `StorageError::Inconsistent` if a listed user is missing.
    async fn get_users_from_realm(&self, realm: &str) -> StorageResult<Vec<User>>;

    /// Creates or replaces a user from a JSON payload.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Malformed` if the payload doesn't decode.
    async fn create_user(&self, payload: &[u8]) -> StorageResult<User>;

    /// Adds an existing user to a realm. Adding twice is a no-op.
    async fn add_user_to_realm(&self, realm: &str, name: &str) -> StorageResult<()>;

    /// Deletes a user and removes it from every realm.
    async fn delete_user(&self, name: &str) -> StorageResult<()>;

    /// Removes a user from one realm, keeping the user itself.
    async fn delete_realm_user(&self, realm: &str, name: &str) -> StorageResult<()>;

    /// Replaces a user's document.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::RenameRejected` if the username or id changed.
    async fn update_user(&self, name: &str, payload: &[u8]) -> StorageResult<User>;
}
