//! Snapshot implementation of the user provider.

use async_trait::async_trait;
use iam_model::User;
use iam_storage::{StorageError, StorageResult, UserProvider};
use tracing::info;
use uuid::Uuid;

use crate::repository::{FileRepository, find_realm, find_realm_mut, find_user, upsert};

fn same_user(a: &User, b: &User) -> bool {
    a.username() == b.username()
}

#[async_trait]
impl UserProvider for FileRepository {
    async fn get_user(&self, name: &str) -> StorageResult<User> {
        let data = self.snapshot();
        find_user(&data, name)
            .cloned()
            .ok_or_else(|| StorageError::not_found("User", name))
    }

    async fn get_user_from_realm(&self, realm: &str, name: &str) -> StorageResult<User> {
        let data = self.snapshot();
        find_realm(&data, realm)?
            .user(name)
            .cloned()
            .ok_or_else(|| StorageError::not_member("User", realm, name))
    }

    async fn get_user_from_realm_by_id(&self, realm: &str, id: Uuid) -> StorageResult<User> {
        let data = self.snapshot();
        find_realm(&data, realm)?
            .users
            .iter()
            .find(|u| u.id() == id)
            .cloned()
            .ok_or_else(|| StorageError::not_found_by_id("User", id))
    }

    async fn get_users_from_realm(&self, realm: &str) -> StorageResult<Vec<User>> {
        let data = self.snapshot();
        Ok(find_realm(&data, realm)?.users.clone())
    }

    async fn create_user(&self, payload: &[u8]) -> StorageResult<User> {
        let user = User::from_slice(payload).map_err(|e| StorageError::from_model_error("User", &e))?;

        self.modify(|data| {
            if let Some(stored) = find_user(data, user.username())
                && stored.id() != user.id()
            {
                return Err(StorageError::rename_rejected(
                    "User",
                    stored.id().to_string(),
                    user.id().to_string(),
                ));
            }
            upsert(&mut data.users, user.clone(), same_user);
            for realm in &mut data.realms {
                if let Some(embedded) = realm.users.iter_mut().find(|u| same_user(u, &user)) {
                    *embedded = user.clone();
                }
            }
            Ok(())
        })?;

        info!(user = user.username(), "User stored");
        Ok(user)
    }

    async fn add_user_to_realm(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            let user = find_user(data, name)
                .cloned()
                .ok_or_else(|| StorageError::not_found("User", name))?;
            let target = find_realm_mut(data, realm)?;
            upsert(&mut target.users, user, same_user);
            Ok(())
        })?;

        info!(realm, user = name, "User added to realm");
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            if find_user(data, name).is_none() {
                return Err(StorageError::not_found("User", name));
            }
            data.users.retain(|u| u.username() != name);
            for realm in &mut data.realms {
                realm.users.retain(|u| u.username() != name);
            }
            Ok(())
        })?;

        info!(user = name, "User deleted");
        Ok(())
    }

    async fn delete_realm_user(&self, realm: &str, name: &str) -> StorageResult<()> {
        self.modify(|data| {
            let target = find_realm_mut(data, realm)?;
            let Some(index) = target.users.iter().position(|u| u.username() == name) else {
                return Err(StorageError::not_member("User", realm, name));
            };
            let removed = target.users.remove(index);
            if !data.users.iter().any(|u| u.username() == name) {
                data.users.push(removed);
            }
            Ok(())
        })?;

        info!(realm, user = name, "User removed from realm");
        Ok(())
    }

    async fn update_user(&self, name: &str, payload: &[u8]) -> StorageResult<User> {
        let user = User::from_slice(payload).map_err(|e| StorageError::from_model_error("User", &e))?;

        self.modify(|data| {
            let stored = find_user(data, name).ok_or_else(|| StorageError::not_found("User", name))?;
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

            upsert(&mut data.users, user.clone(), same_user);
            for realm in &mut data.realms {
                if let Some(embedded) = realm.users.iter_mut().find(|u| same_user(u, &user)) {
                    *embedded = user.clone();
                }
            }
            Ok(())
        })?;

        info!(user = name, "User updated");
        Ok(user)
    }
}
