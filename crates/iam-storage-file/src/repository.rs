//! Snapshot repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use iam_model::{Client, Realm, ServerData, User};
use iam_storage::{StorageError, StorageResult};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::{from_io_error, from_snapshot_error};

/// Repository over one in-memory [`ServerData`] document.
///
/// Reads are lock-free against the current snapshot. Writes clone the
/// snapshot, apply the change and swap the result in; they are never
/// written back to disk.
pub struct FileRepository {
    source: Option<PathBuf>,
    snapshot: ArcSwap<ServerData>,
    write_lock: Mutex<()>,
}

impl FileRepository {
    /// Creates a repository over an in-memory document.
    #[must_use]
    pub fn from_data(data: ServerData) -> Self {
        Self {
            source: None,
            snapshot: ArcSwap::from_pointee(data),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads a repository from a JSON snapshot file.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Unavailable` if the file can't be read and
    /// `StorageError::Malformed` if it doesn't decode.
    pub async fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = read_snapshot(&path).await?;
        log_loaded(&path, &data);

        Ok(Self {
            source: Some(path),
            snapshot: ArcSwap::from_pointee(data),
            write_lock: Mutex::new(()),
        })
    }

    /// Re-reads the snapshot file and swaps it in.
    ///
    /// On failure the current snapshot stays in place. In-memory writes
    /// made since the last load are discarded on success.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Internal` if the repository has no source
    /// file, otherwise the errors of [`FileRepository::load`].
    pub async fn reload(&self) -> StorageResult<()> {
        let Some(path) = &self.source else {
            return Err(StorageError::Internal(
                "snapshot has no source file to reload".to_string(),
            ));
        };

        let data = match read_snapshot(path).await {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Snapshot reload failed, keeping current data");
                return Err(err);
            }
        };

        let _guard = self.write_lock.lock();
        log_loaded(path, &data);
        self.snapshot.store(Arc::new(data));
        Ok(())
    }

    /// Returns the file the snapshot was loaded from.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ServerData> {
        self.snapshot.load_full()
    }

    /// Applies a change to a copy of the snapshot and swaps it in.
    ///
    /// Nothing is swapped if `change` fails.
    pub(crate) fn modify<R>(
        &self,
        change: impl FnOnce(&mut ServerData) -> StorageResult<R>,
    ) -> StorageResult<R> {
        let _guard = self.write_lock.lock();
        let mut data = ServerData::clone(&self.snapshot.load());
        let result = change(&mut data)?;
        self.snapshot.store(Arc::new(data));
        Ok(result)
    }
}

async fn read_snapshot(path: &Path) -> StorageResult<ServerData> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| from_io_error(path, &e))?;
    ServerData::from_slice(&bytes).map_err(|e| from_snapshot_error(&e))
}

fn log_loaded(path: &Path, data: &ServerData) {
    info!(
        path = %path.display(),
        realms = data.realms.len(),
        clients = data.clients.len(),
        users = data.users.len(),
        "Snapshot loaded"
    );
}

pub(crate) fn find_realm<'a>(data: &'a ServerData, name: &str) -> StorageResult<&'a Realm> {
    data.realm(name)
        .ok_or_else(|| StorageError::not_found("Realm", name))
}

pub(crate) fn find_realm_mut<'a>(data: &'a mut ServerData, name: &str) -> StorageResult<&'a mut Realm> {
    data.realms
        .iter_mut()
        .find(|r| r.name == name)
        .ok_or_else(|| StorageError::not_found("Realm", name))
}

/// Looks a client up in the global table, then inside every realm.
pub(crate) fn find_client<'a>(data: &'a ServerData, name: &str) -> Option<&'a Client> {
    data.clients
        .iter()
        .chain(data.realms.iter().flat_map(|r| r.clients.iter()))
        .find(|c| c.name == name)
}

/// Looks a user up in the global table, then inside every realm.
pub(crate) fn find_user<'a>(data: &'a ServerData, name: &str) -> Option<&'a User> {
    data.users
        .iter()
        .chain(data.realms.iter().flat_map(|r| r.users.iter()))
        .find(|u| u.username() == name)
}

/// Inserts or replaces an entry by key.
pub(crate) fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}
