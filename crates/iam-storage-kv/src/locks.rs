//! Per-edge mutation locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes read-modify-rewrite cycles on the same store key, usually a
/// membership list.
///
/// Only guards writers inside this process; separate processes sharing a
/// store still race with last-write-wins semantics.
#[derive(Debug, Default)]
pub struct EdgeLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl EdgeLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to an edge key.
    ///
    /// The table entry is removed when the last holder or waiter for the
    /// key lets go.
    pub async fn lock(&self, key: &str) -> EdgeGuard<'_> {
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        EdgeGuard {
            locks: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no key is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one edge key, released on drop.
#[derive(Debug)]
pub struct EdgeGuard<'a> {
    locks: &'a EdgeLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EdgeGuard<'_> {
    fn drop(&mut self) {
        // Release first so the table holds the only remaining reference.
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
