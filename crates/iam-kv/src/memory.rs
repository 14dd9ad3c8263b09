//! In-process keyed store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{KvError, KvResult};
use crate::store::KeyValueStore;

#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    List(Vec<String>),
}

/// A `DashMap` backed store with the same semantics as the Redis store.
///
/// Useful for tests and single-process deployments. Connection failures
/// can be simulated with [`MemoryStore::set_offline`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with a connection error until
    /// switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_online(&self) -> KvResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(KvError::Connection("store is offline".to_string()));
        }
        Ok(())
    }

    fn get_string(&self, key: &str) -> KvResult<Option<String>> {
        match self.entries.get(key).as_deref() {
            None => Ok(None),
            Some(Entry::Str(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(KvError::WrongType(key.to_string())),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.check_online()?;
        self.get_string(key)
    }

    async fn mget(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        self.check_online()?;
        // MGET reports non-string keys as nil instead of failing.
        Ok(keys
            .iter()
            .map(|key| self.get_string(key).ok().flatten())
            .collect())
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.check_online()?;
        self.entries
            .insert(key.to_string(), Entry::Str(value.to_string()));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> KvResult<u64> {
        self.check_online()?;
        let removed = keys
            .iter()
            .filter(|key| self.entries.remove(key.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        self.check_online()?;
        Ok(self.entries.contains_key(key))
    }

    async fn list_range(&self, key: &str) -> KvResult<Vec<String>> {
        self.check_online()?;
        match self.entries.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(items.clone()),
            Some(Entry::Str(_)) => Err(KvError::WrongType(key.to_string())),
        }
    }

    async fn replace_list(&self, key: &str, entries: &[String]) -> KvResult<()> {
        self.check_online()?;
        if entries.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries
                .insert(key.to_string(), Entry::List(entries.to_vec()));
        }
        Ok(())
    }

    async fn scan_keys(&self, pattern: &str) -> KvResult<Vec<String>> {
        self.check_online()?;
        Ok(self
            .entries
            .iter()
            .filter(|entry| glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect())
    }
}

impl MemoryStore {
    /// Appends an entry to a list without replacing it.
    ///
    /// Mirrors a bare `RPUSH`; used to seed lists written by older
    /// deployments that appended one entry per mutation.
    pub fn push_list_entry(&self, key: &str, entry: &str) -> KvResult<()> {
        self.check_online()?;
        let mut slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match slot.value_mut() {
            Entry::List(items) => {
                items.push(entry.to_string());
                Ok(())
            }
            Entry::Str(_) => Err(KvError::WrongType(key.to_string())),
        }
    }
}

/// Matches `text` against a pattern where `*` matches any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return text.is_empty();
    };
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let middle: Vec<&str> = parts.collect();
    let Some((last, middle)) = middle.split_last() else {
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
