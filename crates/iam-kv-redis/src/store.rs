//! Redis keyed store implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::*;
use fred::types::Builder;
use fred::types::scan::Scanner;
use futures::TryStreamExt;
use iam_kv::{KeyValueStore, KvError, KvResult};
use tracing::{debug, warn};

use crate::config::RedisConfig;
use crate::error::from_redis_error;

const SCAN_PAGE_SIZE: u32 = 100;

/// Redis-backed keyed store.
///
/// Owns a connection pool for its whole lifetime; safe to share between
/// tasks. Every command is bounded by the configured command timeout.
pub struct RedisStore {
    pool: Pool,
    command_timeout: Duration,
}

impl RedisStore {
    /// Connects to Redis.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid or the connection
    /// cannot be established within the connect timeout.
    pub async fn new(config: RedisConfig) -> KvResult<Self> {
        let redis_config = client_config(&config)?;
        let connect_timeout = config.connect_timeout();

        let pool = Builder::from_config(redis_config)
            .with_connection_config(|conn| {
                conn.connection_timeout = connect_timeout;
            })
            .set_policy(ReconnectPolicy::new_exponential(0, 1000, 30_000, 2))
            .build_pool(config.pool_size.max(1))
            .map_err(from_redis_error)?;

        match tokio::time::timeout(connect_timeout, pool.init()).await {
            Ok(result) => {
                result.map_err(from_redis_error)?;
            }
            Err(_) => {
                warn!(host = %config.host, port = config.port, "Redis connection timed out");
                return Err(KvError::Timeout);
            }
        }

        debug!(
            host = %config.host,
            port = config.port,
            database = config.database,
            pool_size = config.pool_size,
            "Connected to Redis"
        );

        Ok(Self {
            pool,
            command_timeout: config.command_timeout(),
        })
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Closes every connection in the pool.
    pub async fn quit(&self) -> KvResult<()> {
        self.pool.quit().await.map_err(from_redis_error)
    }

    /// Runs a command under the command timeout.
    async fn bounded<T, F>(&self, command: F) -> KvResult<T>
    where
        F: Future<Output = Result<T, fred::error::Error>> + Send,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(result) => result.map_err(from_redis_error),
            Err(_) => Err(KvError::Timeout),
        }
    }

    /// Collects keys from a scan pattern.
    async fn collect_keys(&self, pattern: &str) -> KvResult<Vec<String>> {
        let mut scanner = self
            .pool
            .next()
            .scan(pattern, Some(SCAN_PAGE_SIZE), None);
        let mut keys = Vec::new();

        while let Some(result) = scanner.try_next().await.map_err(from_redis_error)? {
            if let Some(page) = result.results() {
                for value in page {
                    if let Some(s) = value.as_str() {
                        keys.push(s.to_string());
                    }
                }
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.bounded(self.pool.get::<Option<String>, _>(key)).await
    }

    async fn mget(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.bounded(self.pool.mget::<Vec<Option<String>>, _>(keys.to_vec()))
            .await
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.bounded(self.pool.set::<(), _, _>(key, value, None, None, false))
            .await
    }

    async fn delete(&self, keys: &[String]) -> KvResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.bounded(self.pool.del::<u64, _>(keys.to_vec())).await
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        let count: i64 = self.bounded(self.pool.exists(key)).await?;
        Ok(count > 0)
    }

    async fn list_range(&self, key: &str) -> KvResult<Vec<String>> {
        self.bounded(self.pool.lrange::<Vec<String>, _>(key, 0, -1))
            .await
    }

    async fn replace_list(&self, key: &str, entries: &[String]) -> KvResult<()> {
        let trx = self.pool.next().multi();
        self.bounded(trx.del::<(), _>(key)).await?;
        if !entries.is_empty() {
            self.bounded(trx.rpush::<(), _, _>(key, entries.to_vec()))
                .await?;
        }
        self.bounded(trx.exec::<()>(true)).await
    }

    async fn scan_keys(&self, pattern: &str) -> KvResult<Vec<String>> {
        match tokio::time::timeout(self.command_timeout, self.collect_keys(pattern)).await {
            Ok(result) => result,
            Err(_) => Err(KvError::Timeout),
        }
    }
}

/// Translates the configuration into a client configuration.
fn client_config(config: &RedisConfig) -> KvResult<Config> {
    let mut client = Config::from_url(&config.connection_url())
        .map_err(|e| KvError::Configuration(e.to_string()))?;
    client.username.clone_from(&config.username);
    client.password.clone_from(&config.password);
    Ok(client)
}
