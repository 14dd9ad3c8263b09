//! End-to-end tests against a real Redis server.
//!
//! These need Docker and are ignored by default:
//!
//! ```text
//! cargo test -p iam-integration-tests -- --ignored
//! ```

mod redis_store;
mod repository;
