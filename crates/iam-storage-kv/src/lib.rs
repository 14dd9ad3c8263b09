//! # iam-storage-kv
//!
//! Keyed store backend for the IAM repository.
//!
//! [`KvRepository`] implements every provider trait of `iam-storage` on top
//! of any [`iam_kv::KeyValueStore`], usually Redis. Entities are stored as
//! JSON documents under their own keys; realm membership lives in separate
//! list keys (see [`keys`]), so one client or user can belong to several
//! realms without being copied.
//!
//! ## Membership writes
//!
//! Every membership change reads the current list, applies the change in
//! memory and replaces the list with one entry in a single transaction.
//! Changes to the same list are serialized inside the process.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
pub mod keys;
mod locks;
mod membership;
mod realm;
mod repository;
mod user;

pub use error::from_kv_error;
pub use keys::{DEFAULT_NAMESPACE, KeySpace};
pub use locks::{EdgeGuard, EdgeLocks};
pub use repository::KvRepository;
