//! Keyed store implementation of the client provider.

use async_trait::async_trait;
use iam_model::{Client, ExtendedIdentifier};
use iam_storage::{ClientProvider, StorageError, StorageResult};
use tracing::{debug, info};

use crate::error::from_kv_error;
use crate::keys::KeySpace;
use crate::membership::{remove_member, upsert_member};
use crate::repository::{KvRepository, decode_client, ensure_same_id, payload_text};

#[async_trait]
impl ClientProvider for KvRepository {
    async fn get_client(&self, name: &str) -> StorageResult<Client> {
        debug!(client = name, "Loading client");
        self.fetch_client(name)
            .await?
            .ok_or_else(|| StorageError::not_found("Client", name))
    }

    async fn get_client_from_realm(&self, realm: &str, name: &str) -> StorageResult<Client> {
        let member = self
            .find_member(realm, "Client", &self.keys.realm_clients(realm), name)
            .await?;
        self.fetch_client(&member.name)
            .await?
            .ok_or_else(|| StorageError::not_found("Client", name))
    }

    async fn get_clients_from_realm(&self, realm: &str) -> StorageResult<Vec<Client>> {
        self.resolve_members(
            realm,
            "Client",
            &self.keys.realm_clients(realm),
            KeySpace::client,
            decode_client,
        )
        .await
    }

    async fn create_client(&self, payload: &[u8]) -> StorageResult<Client> {
        let client =
            Client::from_slice(payload).map_err(|e| StorageError::from_model_error("Client", &e))?;
        let text = payload_text("Client", payload)?;
        self.store_client(&client, text).await?;

        info!(client = %client.name, id = %client.id, "Client stored");
        Ok(client)
    }

    async fn add_client_to_realm(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.require_realm(realm).await?;
        let client = self.get_client(name).await?;

        let member = ExtendedIdentifier::new(client.id, &client.name);
        self.mutate_members(&self.keys.realm_clients(realm), Some(realm), |members| {
            upsert_member(members, member);
            Ok(true)
        })
        .await?;

        info!(realm, client = name, "Client added to realm");
        Ok(())
    }

    async fn delete_client(&self, name: &str) -> StorageResult<()> {
        let key = self.keys.client(name);
        if !self.store.exists(&key).await.map_err(from_kv_error)? {
            return Err(StorageError::not_found("Client", name));
        }

        let edges = self
            .remove_from_all(&self.keys.realm_clients_pattern(), name)
            .await?;
        self.store
            .delete(&[key])
            .await
            .map_err(from_kv_error)?;

        info!(client = name, realms = edges.len(), "Client deleted");
        Ok(())
    }

    async fn delete_realm_client(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.mutate_members(&self.keys.realm_clients(realm), Some(realm), |members| {
            if remove_member(members, name) {
                Ok(true)
            } else {
                Err(StorageError::not_member("Client", realm, name))
            }
        })
        .await?;

        info!(realm, client = name, "Client removed from realm");
        Ok(())
    }

    async fn update_client(&self, name: &str, payload: &[u8]) -> StorageResult<Client> {
        let client =
            Client::from_slice(payload).map_err(|e| StorageError::from_model_error("Client", &e))?;
        let stored = self.get_client(name).await?;

        if client.name != stored.name {
            return Err(StorageError::rename_rejected("Client", &stored.name, &client.name));
        }
        if client.id != stored.id {
            return Err(StorageError::rename_rejected(
                "Client",
                stored.id.to_string(),
                client.id.to_string(),
            ));
        }

        let text = payload_text("Client", payload)?;
        self.put(&self.keys.client(name), text).await?;

        info!(client = name, "Client updated");
        Ok(client)
    }
}

impl KvRepository {
    /// Writes a client record unless it would change the id stored under
    /// the same name.
    pub(crate) async fn store_client(&self, client: &Client, text: &str) -> StorageResult<()> {
        let key = self.keys.client(&client.name);
        let _guard = self.locks.lock(&key).await;

        let stored = self.fetch_client(&client.name).await?;
        ensure_same_id("Client", stored.map(|c| c.id), client.id)?;
        self.put(&key, text).await
    }
}
