//! # iam-storage
//!
//! Repository contract for the IAM identity store.
//!
//! This crate defines the provider interfaces that every backend
//! implements identically. Callers depend only on these traits, usually
//! through an `Arc<dyn Repository>` chosen once at startup.
//!
//! ## Provider Traits
//!
//! - [`RealmProvider`] - realm lookup and lifecycle
//! - [`ClientProvider`] - clients and their realm membership
//! - [`UserProvider`] - users and their realm membership
//! - [`Repository`] - all of the above

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod realm;
pub mod user;

use async_trait::async_trait;
use iam_model::Realm;

pub use client::ClientProvider;
pub use error::{StorageError, StorageResult};
pub use realm::RealmProvider;
pub use user::UserProvider;

/// The full repository contract.
///
/// Implemented automatically for every type that provides realms, clients
/// and users.
#[async_trait]
pub trait Repository: RealmProvider + ClientProvider + UserProvider {
    /// Gets a realm with its member clients and users resolved.
    ///
    /// ## Errors
    ///
    /// Propagates the errors of the realm and bulk member reads.
    async fn get_realm_with_members(&self, name: &str) -> StorageResult<Realm> {
        let mut realm = self.get_realm(name).await?;
        realm.clients = self.get_clients_from_realm(name).await?;
        realm.users = self.get_users_from_realm(name).await?;
        Ok(realm)
    }
}

impl<T> Repository for T where T: RealmProvider + ClientProvider + UserProvider {}
