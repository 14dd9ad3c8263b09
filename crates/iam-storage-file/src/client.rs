//! Snapshot implementation of the client provider.

use async_trait::async_trait;
use iam_model::Client;
use iam_storage::{ClientProvider, StorageError, StorageResult};
use tracing::info;

use crate::repository::{FileRepository, find_client, find_realm, find_realm_mut, upsert};

fn same_client(a: &Client, b: &Client) -> bool {
    a.name == b.name
}

#[async_trait]
impl ClientProvider for FileRepository {
    async fn get_client(&self, name: &str) -> StorageResult<Client> {
        let data = self.snapshot();
        find_client(&data, name)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Client", name))
    }

    async fn get_client_from_realm(&self, realm: &str, name: &str) -> StorageResult<Client> {
        let data = self.snapshot();
        find_realm(&data, realm)?
            .client(name)
            .cloned()
            .ok_or_else(|| StorageError::not_member("Client", realm, name))
    }

    async fn get_clients_from_realm(&self, realm: &str) -> StorageResult<Vec<Client>> {
        let data = self.snapshot();
        Ok(find_realm(&data, realm)?.clients.clone())
    }

    async fn create_client(&self, payload: &[u8]) -> StorageResult<Client> {
        let client =
            Client::from_slice(payload).map_err(|e| StorageError::from_model_error("Client", &e))?;

        self.modify(|data| {
            if let Some(stored) = find_client(data, &client.name)
                && stored.id != client.id
            {
                return Err(StorageError::rename_rejected(
                    "Client",
                    stored.id.to_string(),
                    client.id.to_string(),
                ));
            }
            upsert(&mut data.clients, client.clone(), same_client);
            for realm in &mut data.realms {
                if let Some(embedded) = realm.clients.iter_mut().find(|c| c.name == client.name) {
                    *embedded = client.clone();
                }
            }
            Ok(())
        })?;

        info!(client = %client.name, "Client stored");
        Ok(client)
    }

    async fn add_client_to_realm(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            let client = find_client(data, name)
                .cloned()
                .ok_or_else(|| StorageError::not_found("Client", name))?;
            let target = find_realm_mut(data, realm)?;
            upsert(&mut target.clients, client, same_client);
            Ok(())
        })?;

        info!(realm, client = name, "Client added to realm");
        Ok(())
    }

    async fn delete_client(&self, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            if find_client(data, name).is_none() {
                return Err(StorageError::not_found("Client", name));
            }
            data.clients.retain(|c| c.name != name);
            for realm in &mut data.realms {
                realm.clients.retain(|c| c.name != name);
            }
            Ok(())
        })?;

        info!(client = name, "Client deleted");
        Ok(())
    }

    async fn delete_realm_client(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            let target = find_realm_mut(data, realm)?;
            let Some(index) = target.clients.iter().position(|c| c.name == name) else {
                return Err(StorageError::not_member("Client", realm, name));
            };
            let removed = target.clients.remove(index);
            if !data.clients.iter().any(|c| c.name == name) {
                data.clients.push(removed);
            }
            Ok(())
        })?;

        info!(realm, client = name, "Client removed from realm");
        Ok(())
    }

    async fn update_client(&self, name: &str, payload: &[u8]) -> StorageResult<Client> {
        let client =
            Client::from_slice(payload).map_err(|e| StorageError::from_model_error("Client", &e))?;

        self.modify(|data| {
            let stored = find_client(data, name).ok_or_else(|| StorageError::not_found("Client", name))?;
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

            upsert(&mut data.clients, client.clone(), same_client);
            for realm in &mut data.realms {
                if let Some(embedded) = realm.clients.iter_mut().find(|c| c.name == name) {
                    *embedded = client.clone();
                }
            }
            Ok(())
        })?;

        info!(client = name, "Client updated");
        Ok(client)
    }
}
