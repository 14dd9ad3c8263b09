//! Fixtures for the end-to-end repository tests.
//!
//! One Redis container is started lazily and shared by every test in the
//! binary. Tests isolate themselves by namespace rather than by database.

use iam_core::{DataSourceConfig, DataSourceOptions, DataSourceType};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;
use uuid::Uuid;

static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

/// Returns `host:port` of the shared Redis container, starting it on first use.
///
/// # Panics
///
/// Panics if the container cannot be started.
pub async fn redis_address() -> String {
    let (_, address) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");
            let port = container
                .get_host_port_ipv4(6379)
                .await
                .expect("redis port");
            (container, format!("127.0.0.1:{port}"))
        })
        .await;
    address.clone()
}

/// A namespace no other test uses.
#[must_use]
pub fn unique_namespace() -> String {
    format!("it_{}", Uuid::new_v4().simple())
}

/// A Redis data source on the shared container under a fresh namespace.
pub async fn redis_source() -> DataSourceConfig {
    DataSourceConfig {
        source_type: DataSourceType::Redis,
        source: redis_address().await,
        credentials: None,
        options: DataSourceOptions {
            namespace: Some(unique_namespace()),
            ..DataSourceOptions::default()
        },
    }
}

/// A realm payload without members.
#[must_use]
pub fn realm(name: &str, token_expiration: i64) -> Vec<u8> {
    format!(
        r#"{{"name":"{name}","token_expiration":{token_expiration},"refresh_expiration":{}}}"#,
        token_expiration * 2
    )
    .into_bytes()
}

/// A confidential client payload.
#[must_use]
pub fn client(id: Uuid, name: &str) -> Vec<u8> {
    format!(
        r#"{{"type":"confidential","id":"{id}","name":"{name}","auth":{{"type":1,"value":"secret-{name}"}}}}"#
    )
    .into_bytes()
}

/// A user payload.
#[must_use]
pub fn user(id: Uuid, name: &str) -> Vec<u8> {
    format!(r#"{{"info":{{"sub":"{id}","preferred_username":"{name}"}}}}"#).into_bytes()
}
