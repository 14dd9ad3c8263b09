//! # iam-bootstrap
//!
//! Assembles the IAM repository from configuration.
//!
//! The backend is chosen once at startup from [`iam_core::DataSourceConfig`]
//! and handed to callers as an `Arc<dyn Repository>`; nothing downstream
//! knows which backend is in use.
//!
//! ```ignore
//! let config = iam_core::Config::load("iam.toml")?;
//! iam_bootstrap::init_tracing(&config.logging)?;
//! let repository = iam_bootstrap::build_repository(&config.data_source).await?;
//! ```

#![forbid(unsafe_code)]

pub mod providers;
pub mod telemetry;

pub use providers::{build_repository, key_space, redis_config};
pub use telemetry::init_tracing;
