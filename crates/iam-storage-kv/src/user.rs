//! Keyed store implementation of the user provider.

use async_trait::async_trait;
use iam_model::{ExtendedIdentifier, User};
use iam_storage::{StorageError, StorageResult, UserProvider};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::from_kv_error;
use crate::keys::KeySpace;
use crate::membership::{remove_member, upsert_member};
use crate::repository::{KvRepository, decode_user, ensure_same_id, payload_text};

#[async_trait]
impl UserProvider for KvRepository {
    async fn get_user(&self, name: &str) -> StorageResult<User> {
        debug!(user = name, "Loading user");
        self.fetch_user(name)
            .await?
            .ok_or_else(|| StorageError::not_found("User", name))
    }

    async fn get_user_from_realm(&self, realm: &str, name: &str) -> StorageResult<User> {
        let member = self
            .find_member(realm, "User", &self.keys.realm_users(realm), name)
            .await?;
        self.fetch_user(&member.name)
            .await?
            .ok_or_else(|| StorageError::not_found("User", name))
    }

    async fn get_user_from_realm_by_id(&self, realm: &str, id: Uuid) -> StorageResult<User> {
        self.require_realm(realm).await?;
        let members = self.load_members(&self.keys.realm_users(realm)).await?;
        let Some(member) = members.into_iter().find(|m| m.id == id) else {
            return Err(StorageError::not_found_by_id("User", id));
        };

        self.fetch_user(&member.name)
            .await?
            .ok_or_else(|| StorageError::not_found("User", member.name))
    }

    async fn get_users_from_realm(&self, realm: &str) -> StorageResult<Vec<User>> {
        self.resolve_members(
            realm,
            "User",
            &self.keys.realm_users(realm),
            KeySpace::user,
            decode_user,
        )
        .await
    }

    async fn create_user(&self, payload: &[u8]) -> StorageResult<User> {
        let user = User::from_slice(payload).map_err(|e| StorageError::from_model_error("User", &e))?;
        let text = payload_text("User", payload)?;
        self.store_user(&user, text).await?;

        info!(user = user.username(), id = %user.id(), "User stored");
        Ok(user)
    }

    async fn add_user_to_realm(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.require_realm(realm).await?;
        let user = self.get_user(name).await?;

        let member = ExtendedIdentifier::new(user.id(), user.username());
        self.mutate_members(&self.keys.realm_users(realm), Some(realm), |members| {
            upsert_member(members, member);
            Ok(true)
        })
        .await?;

        info!(realm, user = name, "User added to realm");
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> StorageResult<()> {
        let key = self.keys.user(name);
        if !self.store.exists(&key).await.map_err(from_kv_error)? {
            return Err(StorageError::not_found("User", name));
        }

        let edges = self
            .remove_from_all(&self.keys.realm_users_pattern(), name)
            .await?;
        self.store
            .delete(&[key])
            .await
            .map_err(from_kv_error)?;

        info!(user = name, realms = edges.len(), "User deleted");
        Ok(())
    }

    async fn delete_realm_user(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.mutate_members(&self.keys.realm_users(realm), Some(realm), |members| {
            if remove_member(members, name) {
                Ok(true)
            } else {
                Err(StorageError::not_member("User", realm, name))
            }
        })
        .await?;

        info!(realm, user = name, "User removed from realm");
        Ok(())
    }

    async fn update_user(&self, name: &str, payload: &[u8]) -> StorageResult<User> {
        let user = User::from_slice(payload).map_err(|e| StorageError::from_model_error("User", &e))?;
        let stored = self.get_user(name).await?;

        if user.username() != stored.username() {
            return Err(StorageError::rename_rejected("User", stored.username(), user.username()));
        }
        if user.id() != stored.id() {
            return Err(StorageError::rename_rejected(
                "User",
                stored.id().to_string(),
                user.id().to_string(),
            ));
        }

        let text = payload_text("User", payload)?;
        self.put(&self.keys.user(name), text).await?;

        info!(user = name, "User updated");
        Ok(user)
    }
}

impl KvRepository {
    /// Writes a user record unless it would change the id stored under the
    /// same username.
    pub(crate) async fn store_user(&self, user: &User, text: &str) -> StorageResult<()> {
        let key = self.keys.user(user.username());
        let _guard = self.locks.lock(&key).await;

        let stored = self.fetch_user(user.username()).await?;
        ensure_same_id("User", stored.map(|u| u.id()), user.id())?;
        self.put(&key, text).await
    }
}
