//! # iam-kv
//!
//! Keyed store primitive for the IAM repository backends.
//!
//! The keyed repository backend talks to its store only through
//! [`KeyValueStore`]: string values, list values holding membership
//! edges, key scans and an atomic list replace. The primary
//! implementation is Redis based (see `iam-kv-redis`); [`MemoryStore`]
//! serves tests and single-process deployments.
//!
//! ## Example
//!
//! ```ignore
//! use iam_kv::{KeyValueStore, KvResult};
//!
//! async fn members(store: &dyn KeyValueStore, realm: &str) -> KvResult<Vec<String>> {
//!     store.list_range(&format!("fe.realm_{realm}_users")).await
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod store;

pub use error::{KvError, KvResult};
pub use memory::MemoryStore;
pub use store::KeyValueStore;
