//! Client storage provider trait.

use async_trait::async_trait;
use iam_model::Client;

use crate::error::StorageResult;

/// Provider for client storage operations.
///
/// Clients are stored once and shared between realms through membership.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Gets a client by name.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the client doesn't exist.
    async fn get_client(&self, name: &str) -> StorageResult<Client>;

    /// Gets a client that is a member of the realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm or client doesn't
    /// exist, or `StorageError::NotMember` if the realm doesn't list it.
    async fn get_client_from_realm(&self, realm: &str, name: &str) -> StorageResult<Client>;

    /// Gets every client of a realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown realm and
    /// `StorageError::Inconsistent` if a listed client is missing.
    async fn get_clients_from_realm(&self, realm: &str) -> StorageResult<Vec<Client>>;

    /// Creates or replaces a client from a JSON payload.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Malformed` if the payload doesn't decode.
    async fn create_client(&self, payload: &[u8]) -> StorageResult<Client>;

    /// Adds an existing client to a realm. Adding twice is a no-op.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm or client doesn't exist.
    async fn add_client_to_realm(&self, realm: &str, name: &str) -> StorageResult<()>;

    /// Deletes a client and removes it from every realm.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the client doesn't exist.
    async fn delete_client(&self, name: &str) -> StorageResult<()>;

    /// Removes a client from one realm, keeping the client itself.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the realm doesn't exist, or
    /// `StorageError::NotMember` if the client isn't listed.
    async fn delete_realm_client(&self, realm: &str, name: &str) -> StorageResult<()>;

    /// Replaces a client's payload.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the client doesn't exist and
    /// `StorageError::RenameRejected` if the name or id changed.
    async fn update_client(&self, name: &str, payload: &[u8]) -> StorageResult<Client>;
}
