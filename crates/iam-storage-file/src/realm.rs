//! Snapshot implementation of the realm provider.

use async_trait::async_trait;
use iam_model::Realm;
use iam_storage::{RealmProvider, StorageError, StorageResult};
use tracing::info;

use crate::repository::{
    FileRepository, find_client, find_realm, find_realm_mut, find_user, upsert,
};

#[async_trait]
impl RealmProvider for FileRepository {
    async fn get_realm(&self, name: &str) -> StorageResult<Realm> {
        let data = self.snapshot();
        find_realm(&data, name).cloned()
    }

    async fn create_realm(&self, payload: &[u8]) -> StorageResult<Realm> {
        let realm = Realm::from_slice(payload).map_err(|e| StorageError::from_model_error("Realm", &e))?;

        self.modify(|data| {
            if data.realm(&realm.name).is_some() {
                return Err(StorageError::duplicate("Realm", "name", &realm.name));
            }
            for client in &realm.clients {
                if let Some(stored) = find_client(data, &client.name)
                    && stored.id != client.id
                {
                    return Err(StorageError::rename_rejected(
                        "Client",
                        stored.id.to_string(),
                        client.id.to_string(),
                    ));
                }
            }
            for user in &realm.users {
                if let Some(stored) = find_user(data, user.username())
                    && stored.id() != user.id()
                {
                    return Err(StorageError::rename_rejected(
                        "User",
                        stored.id().to_string(),
                        user.id().to_string(),
                    ));
                }
            }
            for client in &realm.clients {
                upsert(&mut data.clients, client.clone(), |a, b| a.name == b.name);
            }
            for user in &realm.users {
                upsert(&mut data.users, user.clone(), |a, b| a.username() == b.username());
            }
            data.realms.push(realm.clone());
            Ok(())
        })?;

        info!(realm = %realm.name, "Realm created");
        Ok(realm)
    }

    async fn update_realm(&self, name: &str, payload: &[u8]) -> StorageResult<Realm> {
        let update = Realm::from_slice(payload).map_err(|e| StorageError::from_model_error("Realm", &e))?;
        if update.name != name {
            return Err(StorageError::rename_rejected("Realm", name, &update.name));
        }

        let realm = self.modify(|data| {
            let realm = find_realm_mut(data, name)?;
            realm.token_expiration = update.token_expiration;
            realm.refresh_expiration = update.refresh_expiration;
            Ok(realm.clone())
        })?;

        info!(realm = name, "Realm updated");
        Ok(realm)
    }

    async fn delete_realm(&self, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            let Some(index) = data.realms.iter().position(|r| r.name == name) else {
                return Err(StorageError::not_found("Realm", name));
            };
            let removed = data.realms.remove(index);
            // Members only embedded in the removed realm stay addressable.
            for client in removed.clients {
                if !data.clients.iter().any(|c| c.name == client.name) {
                    data.clients.push(client);
                }
            }
            for user in removed.users {
                if !data.users.iter().any(|u| u.username() == user.username()) {
                    data.users.push(user);
                }
            }
            Ok(())
        })?;

        info!(realm = name, "Realm deleted");
        Ok(())
    }
}
