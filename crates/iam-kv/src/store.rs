//! Keyed store trait.

use async_trait::async_trait;

use crate::error::KvResult;

/// String and list operations over a shared keyed store.
///
/// Implementations must be thread-safe and support concurrent access.
/// Values are opaque strings; callers own serialization.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets a string value.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Gets several string values in one round trip.
    ///
    /// The result has one slot per key, in order.
    async fn mget(&self, keys: &[String]) -> KvResult<Vec<Option<String>>>;

    /// Sets a string value, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Deletes keys of any kind.
    ///
    /// Returns the number of keys that existed.
    async fn delete(&self, keys: &[String]) -> KvResult<u64>;

    /// Checks if a key exists.
    async fn exists(&self, key: &str) -> KvResult<bool>;

    /// Gets every entry of a list. A missing key is an empty list.
    async fn list_range(&self, key: &str) -> KvResult<Vec<String>>;

    /// Atomically replaces a list with the given entries.
    ///
    /// An empty `entries` slice leaves the key deleted.
    async fn replace_list(&self, key: &str, entries: &[String]) -> KvResult<()>;

    /// Lists keys matching a glob pattern where `*` matches any run of
    /// characters.
    async fn scan_keys(&self, pattern: &str) -> KvResult<Vec<String>>;
}
