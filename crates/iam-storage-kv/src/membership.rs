//! Realm membership lists.
//!
//! A membership key is a list whose entries are JSON arrays of
//! [`ExtendedIdentifier`]. After any mutation through this module the list
//! holds exactly one entry with the complete membership. Older writers
//! appended one entry per change, so readers concatenate every entry.

use iam_model::ExtendedIdentifier;
use iam_storage::{StorageError, StorageResult};
use tracing::{debug, error};

use crate::error::{corrupt, from_kv_error};
use crate::keys::KeySpace;
use crate::repository::{KvRepository, encode};

impl KvRepository {
    /// Reads the members listed under an edge key.
    ///
    /// Duplicate names keep the position of their first entry and the
    /// value of their last.
    pub(crate) async fn load_members(&self, edge: &str) -> StorageResult<Vec<ExtendedIdentifier>> {
        let entries = self.store.list_range(edge).await.map_err(from_kv_error)?;

        let mut members: Vec<ExtendedIdentifier> = Vec::new();
        for entry in entries {
            let batch: Vec<ExtendedIdentifier> =
                serde_json::from_str(&entry).map_err(|e| corrupt("membership", edge, e))?;
            for member in batch {
                upsert_member(&mut members, member);
            }
        }
        Ok(members)
    }

    /// Finds one member of a realm by name.
    ///
    /// Fails with `NotFound` for an unknown realm, even if a list is still
    /// stored under its edge key, and `NotMember` when the realm exists but
    /// does not list the name.
    pub(crate) async fn find_member(
        &self,
        realm: &str,
        entity_type: &'static str,
        edge: &str,
        name: &str,
    ) -> StorageResult<ExtendedIdentifier> {
        self.require_realm(realm).await?;
        self.load_members(edge)
            .await?
            .into_iter()
            .find(|m| m.name == name)
            .ok_or_else(|| StorageError::not_member(entity_type, realm, name))
    }

    /// Resolves every member of a realm with one batch read.
    ///
    /// Fails with `NotFound` when the realm document is missing, whatever
    /// the edge holds. Members whose records are missing fail the whole call.
    pub(crate) async fn resolve_members<T>(
        &self,
        realm: &str,
        entity_type: &'static str,
        edge: &str,
        key_of: fn(&KeySpace, &str) -> String,
        decode: fn(&str, &str) -> StorageResult<T>,
    ) -> StorageResult<Vec<T>>
    where
        T: Send,
    {
        self.require_realm(realm).await?;
        let members = self.load_members(edge).await?;
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = members.iter().map(|m| key_of(&self.keys, &m.name)).collect();
        let values = self.store.mget(&keys).await.map_err(from_kv_error)?;

        let mut resolved = Vec::with_capacity(values.len());
        let mut missing = Vec::new();
        for ((member, key), value) in members.iter().zip(&keys).zip(values) {
            match value {
                Some(raw) => resolved.push(decode(key, &raw)?),
                None => missing.push(member.name.clone()),
            }
        }

        if !missing.is_empty() {
            error!(
                realm,
                entity_type,
                missing = ?missing,
                "Realm membership references missing records"
            );
            return Err(StorageError::Inconsistent {
                realm: realm.to_string(),
                entity_type,
                missing,
            });
        }
        Ok(resolved)
    }

    /// Applies a change to a membership list under its lock.
    ///
    /// With `realm` set, the realm document must exist once the lock is
    /// held; a realm deleted concurrently fails with `NotFound` and the
    /// list is left alone.
    ///
    /// `change` returns whether it modified the list; the list is only
    /// rewritten when it did. Errors from `change` abort without writing.
    pub(crate) async fn mutate_members<F>(
        &self,
        edge: &str,
        realm: Option<&str>,
        change: F,
    ) -> StorageResult<bool>
    where
        F: FnOnce(&mut Vec<ExtendedIdentifier>) -> StorageResult<bool> + Send,
    {
        let _guard = self.locks.lock(edge).await;
        if let Some(realm) = realm {
            self.require_realm(realm).await?;
        }

        let mut members = self.load_members(edge).await?;
        if !change(&mut members)? {
            return Ok(false);
        }

        let entry = encode("membership", &members)?;
        self.store
            .replace_list(edge, &[entry])
            .await
            .map_err(from_kv_error)?;

        debug!(edge, members = members.len(), "Rewrote membership list");
        Ok(true)
    }

    /// Removes a name from every membership list matching `pattern`.
    ///
    /// Returns the edge keys that were rewritten.
    pub(crate) async fn remove_from_all(&self, pattern: &str, name: &str) -> StorageResult<Vec<String>> {
        let edges = self.store.scan_keys(pattern).await.map_err(from_kv_error)?;

        let mut rewritten = Vec::new();
        for edge in edges {
            let changed = self
                .mutate_members(&edge, None, |members| Ok(remove_member(members, name)))
                .await?;
            if changed {
                rewritten.push(edge);
            }
        }
        Ok(rewritten)
    }
}

/// Inserts or replaces a member by name.
pub(crate) fn upsert_member(members: &mut Vec<ExtendedIdentifier>, member: ExtendedIdentifier) {
    match members.iter_mut().find(|m| m.name == member.name) {
        Some(existing) => *existing = member,
        None => members.push(member),
    }
}

/// Removes a member by name, returning whether it was present.
pub(crate) fn remove_member(members: &mut Vec<ExtendedIdentifier>, name: &str) -> bool {
    let before = members.len();
    members.retain(|m| m.name != name);
    members.len() != before
}
