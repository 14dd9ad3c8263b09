//! # iam-kv-redis
//!
//! Redis implementation of the IAM keyed store.
//!
//! This crate provides [`RedisStore`] using the `fred` crate, implementing
//! the [`iam_kv::KeyValueStore`] trait used by the keyed repository backend.
//!
//! ## Features
//!
//! - Connection pooling with automatic reconnection
//! - TLS support
//! - Per-command timeouts that surface as [`iam_kv::KvError::Timeout`]
//! - Atomic list replacement through `MULTI`/`EXEC`
//!
//! ## Example
//!
//! ```ignore
//! use iam_kv::KeyValueStore;
//! use iam_kv_redis::{RedisConfig, RedisStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisConfig::default()
//!         .host("localhost")
//!         .port(6379);
//!
//!     let store = RedisStore::new(config).await?;
//!
//!     store.set("fe.realm_acme", r#"{"name":"acme"}"#).await?;
//!     let value = store.get("fe.realm_acme").await?;
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod store;

pub use config::RedisConfig;
pub use store::RedisStore;
