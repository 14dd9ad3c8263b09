//! # iam-model
//!
//! Identity model for the IAM repository layer.
//!
//! This crate defines the value types exchanged between the repository
//! backends and their callers. Every type is returned by copy; nothing here
//! hands out references into backend storage.
//!
//! - [`Realm`] - a tenant grouping clients and users
//! - [`Client`] - a registered application
//! - [`User`] - a principal backed by an open attribute document
//! - [`ExtendedIdentifier`] - the `{id, name}` pair stored in membership edges
//! - [`ServerData`] - the root document of a JSON snapshot

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod identifier;
pub mod realm;
pub mod snapshot;
pub mod user;

pub use client::{Authentication, AuthenticationType, Client, ClientType};
pub use error::{ModelError, ModelResult};
pub use identifier::ExtendedIdentifier;
pub use realm::Realm;
pub use snapshot::ServerData;
pub use user::User;
