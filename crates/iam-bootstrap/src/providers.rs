//! Repository construction.

use std::sync::Arc;

use anyhow::Context;
use iam_core::{DataSourceConfig, DataSourceOptions, DataSourceType};
use iam_kv::{KeyValueStore, MemoryStore};
use iam_kv_redis::{RedisConfig, RedisStore};
use iam_storage::Repository;
use iam_storage_file::FileRepository;
use iam_storage_kv::{KeySpace, KvRepository};
use tracing::info;

/// Builds the repository selected by the data source configuration.
///
/// For `redis` this connects to the server and fails if it is unreachable
/// within the connect timeout. For `file` the snapshot is loaded eagerly.
pub async fn build_repository(config: &DataSourceConfig) -> anyhow::Result<Arc<dyn Repository>> {
    config.validate().context("invalid data source configuration")?;

    let repository: Arc<dyn Repository> = match config.source_type {
        DataSourceType::File => {
            let repository = FileRepository::load(&config.source)
                .await
                .with_context(|| format!("failed to load snapshot {}", config.source))?;
            info!(source = %config.source, "Using snapshot repository");
            Arc::new(repository)
        }
        DataSourceType::Redis => {
            let redis = redis_config(config)?;
            let store = RedisStore::new(redis)
                .await
                .with_context(|| format!("failed to connect to Redis at {}", config.source))?;
            let keys = key_space(&config.options)?;
            info!(source = %config.source, namespace = keys.namespace(), "Using Redis repository");
            Arc::new(KvRepository::with_keys(Arc::new(store), keys))
        }
        DataSourceType::Memory => {
            let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
            let keys = key_space(&config.options)?;
            info!(namespace = keys.namespace(), "Using in-memory repository");
            Arc::new(KvRepository::with_keys(store, keys))
        }
    };

    Ok(repository)
}

/// Maps a `redis` data source onto the client configuration.
pub fn redis_config(config: &DataSourceConfig) -> anyhow::Result<RedisConfig> {
    let (host, port) = config.redis_address()?;
    let options = &config.options;

    let mut redis = RedisConfig::new()
        .host(host)
        .port(port)
        .database(options.db_number)
        .tls(options.use_tls)
        .pool_size(options.pool_size)
        .connect_timeout_ms(options.connect_timeout_ms)
        .command_timeout_ms(options.command_timeout_ms);

    if let Some(credentials) = &config.credentials {
        if let Some(username) = credentials.username.as_deref().filter(|u| !u.is_empty()) {
            redis = redis.username(username);
        }
        if let Some(password) = credentials.password.as_deref().filter(|p| !p.is_empty()) {
            redis = redis.password(password);
        }
    }
    Ok(redis)
}

/// Builds the key space for the configured namespace.
pub fn key_space(options: &DataSourceOptions) -> anyhow::Result<KeySpace> {
    match &options.namespace {
        Some(namespace) => KeySpace::new(namespace.as_str())
            .with_context(|| format!("invalid namespace '{namespace}'")),
        None => Ok(KeySpace::default()),
    }
}
