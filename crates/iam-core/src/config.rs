//! Configuration management.
//!
//! Configuration is loaded from a JSON or TOML file (chosen by extension)
//! and then adjusted from the environment:
//!
//! | Variable | Effect |
//! |---|---|
//! | `IAM_DATA_SOURCE` | replaces `data_source.source` |
//! | `IAM_NAMESPACE` | replaces `data_source.options.namespace` |
//! | `IAM_REDIS_PASSWORD` | replaces `data_source.credentials.password` |
//!
//! A `.env` file in the working directory is read first if present.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the data source location.
pub const ENV_DATA_SOURCE: &str = "IAM_DATA_SOURCE";
/// Environment variable overriding the key namespace.
pub const ENV_NAMESPACE: &str = "IAM_NAMESPACE";
/// Environment variable overriding the Redis password.
pub const ENV_REDIS_PASSWORD: &str = "IAM_REDIS_PASSWORD";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repository backend selection.
    pub data_source: DataSourceConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceType {
    /// JSON snapshot file.
    File,
    /// Redis keyed store.
    Redis,
    /// In-process keyed store.
    Memory,
}

/// Repository backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Backend kind.
    #[serde(rename = "type")]
    pub source_type: DataSourceType,
    /// Snapshot path for `file`, `host:port` for `redis`.
    #[serde(default)]
    pub source: String,
    /// Store credentials.
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Backend options.
    #[serde(default)]
    pub options: DataSourceOptions,
}

/// Store credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// ACL username.
    #[serde(default)]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Keyed store options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceOptions {
    /// Key namespace; the backend default applies when unset.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Redis database number.
    #[serde(default)]
    pub db_number: u8,
    /// Connect over TLS.
    #[serde(default)]
    pub use_tls: bool,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Per-command timeout in milliseconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,
}

impl Default for DataSourceOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            db_number: 0,
            use_tls: false,
            pool_size: default_pool_size(),
            connect_timeout_ms: default_connect_timeout(),
            command_timeout_ms: default_command_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Loads configuration from a file, then applies environment overrides
    /// and validates the result.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file can't be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded environment file");
        }

        let content = std::fs::read_to_string(path)?;
        let mut config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(Error::config(format!(
                    "unsupported configuration format {other:?} for {}",
                    path.display()
                )));
            }
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parses a TOML configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(source) = lookup(ENV_DATA_SOURCE) {
            self.data_source.source = source;
        }
        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            self.data_source.options.namespace = Some(namespace);
        }
        if let Some(password) = lookup(ENV_REDIS_PASSWORD) {
            self.data_source
                .credentials
                .get_or_insert_with(Credentials::default)
                .password = Some(password);
        }
    }

    /// Checks the configuration for missing or inconsistent values.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.data_source.validate()
    }
}

impl DataSourceConfig {
    /// Checks the backend configuration.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match self.source_type {
            DataSourceType::File => {
                if self.source.trim().is_empty() {
                    return Err(Error::config("data_source.source must name a snapshot file"));
                }
            }
            DataSourceType::Redis => {
                self.redis_address()?;
                if self.options.pool_size == 0 {
                    return Err(Error::config("data_source.options.pool_size must be positive"));
                }
                if self.options.command_timeout_ms == 0 {
                    return Err(Error::config(
                        "data_source.options.command_timeout_ms must be positive",
                    ));
                }
            }
            DataSourceType::Memory => {}
        }

        if let Some(namespace) = &self.options.namespace
            && namespace.is_empty()
        {
            return Err(Error::config("data_source.options.namespace must not be empty"));
        }
        Ok(())
    }

    /// Splits `source` into Redis host and port.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if `source` is not `host:port`.
    pub fn redis_address(&self) -> Result<(String, u16)> {
        let (host, port) = self
            .source
            .rsplit_once(':')
            .ok_or_else(|| Error::config(format!("'{}' is not host:port", self.source)))?;
        if host.is_empty() {
            return Err(Error::config(format!("'{}' has no host", self.source)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| Error::config(format!("invalid port in '{}': {e}", self.source)))?;
        Ok((host.to_string(), port))
    }
}

fn default_level() -> String {
    "info".to_string()
}

const fn default_pool_size() -> usize {
    4
}

const fn default_connect_timeout() -> u64 {
    5000
}

const fn default_command_timeout() -> u64 {
    2000
}
