//! Keyed store implementation of the realm provider.

use std::collections::HashSet;

use async_trait::async_trait;
use iam_model::{ExtendedIdentifier, Realm};
use iam_storage::{RealmProvider, StorageError, StorageResult};
use tracing::{debug, info};

use crate::error::from_kv_error;
use crate::keys::KeySpace;
use crate::repository::{KvRepository, encode, ensure_same_id};

#[async_trait]
impl RealmProvider for KvRepository {
    async fn get_realm(&self, name: &str) -> StorageResult<Realm> {
        debug!(realm = name, "Loading realm");
        self.fetch_realm(name)
            .await?
            .ok_or_else(|| StorageError::not_found("Realm", name))
    }

    async fn create_realm(&self, payload: &[u8]) -> StorageResult<Realm> {
        let realm = Realm::from_slice(payload).map_err(|e| StorageError::from_model_error("Realm", &e))?;
        KeySpace::validate_realm_name(&realm.name)?;

        if self.realm_exists(&realm.name).await? {
            return Err(StorageError::duplicate("Realm", "name", &realm.name));
        }

        // Nothing is written if any embedded member conflicts.
        let mut seen = HashSet::new();
        for client in &realm.clients {
            if !seen.insert(client.name.as_str()) {
                return Err(StorageError::duplicate("Client", "name", &client.name));
            }
            let stored = self.fetch_client(&client.name).await?;
            ensure_same_id("Client", stored.map(|c| c.id), client.id)?;
        }
        let mut seen = HashSet::new();
        for user in &realm.users {
            if !seen.insert(user.username()) {
                return Err(StorageError::duplicate("User", "name", user.username()));
            }
            let stored = self.fetch_user(user.username()).await?;
            ensure_same_id("User", stored.map(|u| u.id()), user.id())?;
        }

        for client in &realm.clients {
            self.store_client(client, &encode("Client", client)?).await?;
        }
        for user in &realm.users {
            self.store_user(user, &encode("User", user)?).await?;
        }

        let clients: Vec<ExtendedIdentifier> = realm
            .clients
            .iter()
            .map(|c| ExtendedIdentifier::new(c.id, &c.name))
            .collect();
        self.reset_members(&self.keys.realm_clients(&realm.name), clients)
            .await?;
        let users: Vec<ExtendedIdentifier> = realm
            .users
            .iter()
            .map(|u| ExtendedIdentifier::new(u.id(), u.username()))
            .collect();
        self.reset_members(&self.keys.realm_users(&realm.name), users)
            .await?;

        // Written last so an interrupted cascade can be retried.
        self.put(
            &self.keys.realm(&realm.name),
            &encode("Realm", &realm.without_members())?,
        )
        .await?;

        info!(
            realm = %realm.name,
            clients = realm.clients.len(),
            users = realm.users.len(),
            "Realm created"
        );
        Ok(realm)
    }

    async fn update_realm(&self, name: &str, payload: &[u8]) -> StorageResult<Realm> {
        let realm = Realm::from_slice(payload).map_err(|e| StorageError::from_model_error("Realm", &e))?;
        if realm.name != name {
            return Err(StorageError::rename_rejected("Realm", name, &realm.name));
        }
        self.require_realm(name).await?;

        let stored = realm.without_members();
        self.put(&self.keys.realm(name), &encode("Realm", &stored)?)
            .await?;

        info!(realm = name, "Realm updated");
        Ok(stored)
    }

    async fn delete_realm(&self, name: &str) -> StorageResult<()> {
        self.require_realm(name).await?;

        let clients_edge = self.keys.realm_clients(name);
        let users_edge = self.keys.realm_users(name);
        let _clients = self.locks.lock(&clients_edge).await;
        let _users = self.locks.lock(&users_edge).await;

        self.store
            .delete(&[self.keys.realm(name), clients_edge, users_edge])
            .await
            .map_err(from_kv_error)?;

        info!(realm = name, "Realm deleted");
        Ok(())
    }
}

impl KvRepository {
    /// Sets a new realm's membership to exactly `members`, dropping entries
    /// left behind by an earlier realm of the same name.
    async fn reset_members(&self, edge: &str, members: Vec<ExtendedIdentifier>) -> StorageResult<()> {
        self.mutate_members(edge, None, |current| {
            let changed = *current != members;
            *current = members;
            Ok(changed)
        })
        .await?;
        Ok(())
    }
}
