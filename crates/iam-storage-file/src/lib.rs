//! # iam-storage-file
//!
//! Snapshot backend for the IAM repository.
//!
//! [`FileRepository`] serves every provider trait of `iam-storage` from a
//! single [`iam_model::ServerData`] JSON document loaded at startup.
//! Realms embed their clients and users; lookups are exact, case-sensitive
//! linear scans, which suits small read-mostly deployments.
//!
//! The loaded document can be replaced at runtime with
//! [`FileRepository::reload`]. Readers never observe a partially loaded
//! snapshot, and a failed reload keeps serving the previous one.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
pub mod error;
mod realm;
mod repository;
mod user;

pub use repository::FileRepository;
