//! Shared fixtures for repository tests.

#![allow(dead_code)]

use std::sync::Arc;

use iam_kv::MemoryStore;
use iam_storage_kv::KvRepository;
use uuid::Uuid;

/// Builds a repository over a fresh in-memory store.
pub fn repository() -> (Arc<MemoryStore>, KvRepository) {
    let store = Arc::new(MemoryStore::new());
    let repo = KvRepository::new(store.clone());
    (store, repo)
}

/// A realm payload without members.
pub fn realm(name: &str, token_expiration: i64) -> Vec<u8> {
    format!(
        r#"{{"name":"{name}","token_expiration":{token_expiration},"refresh_expiration":{}}}"#,
        token_expiration * 2
    )
    .into_bytes()
}

/// A confidential client payload.
pub fn client(id: Uuid, name: &str) -> Vec<u8> {
    format!(
        r#"{{"type":"confidential","id":"{id}","name":"{name}","auth":{{"type":1,"value":"secret-{name}"}}}}"#
    )
    .into_bytes()
}

/// A user payload with an extra claim.
pub fn user(id: Uuid, name: &str) -> Vec<u8> {
    format!(
        r#"{{"info":{{"sub":"{id}","preferred_username":"{name}","email":"{name}@example.com"}},"credentials":{{"password":"pw"}}}}"#
    )
    .into_bytes()
}
