//! # iam-core
//!
//! Configuration and error handling shared by the IAM repository crates.
//!
//! [`Config`] describes which backend to use ([`DataSourceConfig`]) and how
//! to log ([`LoggingConfig`]). It is read from a JSON or TOML file and then
//! adjusted from the environment.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::{
    Config, Credentials, DataSourceConfig, DataSourceOptions, DataSourceType, LoggingConfig,
};
pub use error::{Error, Result};
