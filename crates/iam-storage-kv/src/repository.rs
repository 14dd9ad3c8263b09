//! Keyed store repository.

use std::sync::Arc;

use iam_kv::KeyValueStore;
use iam_model::{Client, Realm, User};
use iam_storage::{StorageError, StorageResult};
use uuid::Uuid;

use crate::error::{corrupt, from_kv_error};
use crate::keys::KeySpace;
use crate::locks::EdgeLocks;

/// Repository over a shared keyed store.
///
/// Entities live under their own keys; realms reach their clients and
/// users only through membership lists. Cheap to share behind an `Arc`.
pub struct KvRepository {
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) keys: KeySpace,
    pub(crate) locks: EdgeLocks,
}

impl KvRepository {
    /// Creates a repository in the default namespace.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(store, KeySpace::default())
    }

    /// Creates a repository with an explicit key space.
    #[must_use]
    pub fn with_keys(store: Arc<dyn KeyValueStore>, keys: KeySpace) -> Self {
        Self {
            store,
            keys,
            locks: EdgeLocks::new(),
        }
    }

    /// Returns the key space in use.
    #[must_use]
    pub const fn keys(&self) -> &KeySpace {
        &self.keys
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub(crate) async fn fetch_realm(&self, name: &str) -> StorageResult<Option<Realm>> {
        if !KeySpace::is_valid_realm_name(name) {
            return Ok(None);
        }
        let key = self.keys.realm(name);
        let Some(raw) = self.store.get(&key).await.map_err(from_kv_error)? else {
            return Ok(None);
        };
        let realm = Realm::from_slice(raw.as_bytes()).map_err(|e| corrupt("Realm", &key, e))?;
        Ok(Some(realm))
    }

    pub(crate) async fn realm_exists(&self, name: &str) -> StorageResult<bool> {
        if !KeySpace::is_valid_realm_name(name) {
            return Ok(false);
        }
        self.store
            .exists(&self.keys.realm(name))
            .await
            .map_err(from_kv_error)
    }

    pub(crate) async fn require_realm(&self, name: &str) -> StorageResult<()> {
        if self.realm_exists(name).await? {
            Ok(())
        } else {
            Err(StorageError::not_found("Realm", name))
        }
    }

    pub(crate) async fn fetch_client(&self, name: &str) -> StorageResult<Option<Client>> {
        let key = self.keys.client(name);
        let raw = self.store.get(&key).await.map_err(from_kv_error)?;
        raw.map(|raw| decode_client(&key, &raw)).transpose()
    }

    pub(crate) async fn fetch_user(&self, name: &str) -> StorageResult<Option<User>> {
        let key = self.keys.user(name);
        let raw = self.store.get(&key).await.map_err(from_kv_error)?;
        raw.map(|raw| decode_user(&key, &raw)).transpose()
    }

    pub(crate) async fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.store.set(key, value).await.map_err(from_kv_error)
    }
}

pub(crate) fn decode_client(key: &str, raw: &str) -> StorageResult<Client> {
    Client::from_slice(raw.as_bytes()).map_err(|e| corrupt("Client", key, e))
}

pub(crate) fn decode_user(key: &str, raw: &str) -> StorageResult<User> {
    User::from_slice(raw.as_bytes()).map_err(|e| corrupt("User", key, e))
}

/// Fails with `RenameRejected` when a create would change the id stored
/// under an existing name. Realm memberships record ids.
pub(crate) fn ensure_same_id(
    entity_type: &'static str,
    stored: Option<Uuid>,
    incoming: Uuid,
) -> StorageResult<()> {
    match stored {
        Some(stored) if stored != incoming => Err(StorageError::rename_rejected(
            entity_type,
            stored.to_string(),
            incoming.to_string(),
        )),
        _ => Ok(()),
    }
}

/// Borrows a payload as UTF-8 text for storage.
pub(crate) fn payload_text<'a>(entity_type: &'static str, payload: &'a [u8]) -> StorageResult<&'a str> {
    std::str::from_utf8(payload).map_err(|e| StorageError::malformed(entity_type, e))
}

pub(crate) fn encode<T: serde::Serialize>(entity_type: &'static str, value: &T) -> StorageResult<String> {
    serde_json::to_string(value)
        .map_err(|e| StorageError::Internal(format!("failed to encode {entity_type}: {e}")))
}
