//! Keyed store primitive over Redis.

use iam_integration_tests::{redis_address, unique_namespace};
use iam_kv::{KeyValueStore, KvError};
use iam_kv_redis::{RedisConfig, RedisStore};

async fn store() -> anyhow::Result<(RedisStore, String)> {
    let address = redis_address().await;
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("bad address {address}"))?;
    let config = RedisConfig::new().host(host).port(port.parse()?);
    Ok((RedisStore::new(config).await?, unique_namespace()))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn strings_and_batch_reads() -> anyhow::Result<()> {
    let (store, ns) = store().await?;
    let a = format!("{ns}.client_a");
    let b = format!("{ns}.client_b");

    store.set(&a, "first").await?;
    store.set(&b, "second").await?;

    assert_eq!(store.get(&a).await?.as_deref(), Some("first"));
    assert!(store.exists(&b).await?);
    let values = store
        .mget(&[a.clone(), format!("{ns}.client_missing"), b.clone()])
        .await?;
    assert_eq!(
        values,
        vec![Some("first".to_string()), None, Some("second".to_string())]
    );

    assert_eq!(store.delete(&[a.clone(), b, format!("{ns}.nothing")]).await?, 2);
    assert!(store.get(&a).await?.is_none());
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn replace_list_leaves_single_entry() -> anyhow::Result<()> {
    let (store, ns) = store().await?;
    let key = format!("{ns}.realm_acme_users");

    store.replace_list(&key, &["one".to_string(), "two".to_string()]).await?;
    store.replace_list(&key, &["three".to_string()]).await?;
    assert_eq!(store.list_range(&key).await?, vec!["three".to_string()]);

    store.replace_list(&key, &[]).await?;
    assert!(!store.exists(&key).await?);
    assert!(store.list_range(&key).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn scan_matches_namespace_only() -> anyhow::Result<()> {
    let (store, ns) = store().await?;
    let other = unique_namespace();

    for realm in ["acme", "beta"] {
        store
            .replace_list(&format!("{ns}.realm_{realm}_clients"), &["[]".to_string()])
            .await?;
    }
    store
        .replace_list(&format!("{other}.realm_acme_clients"), &["[]".to_string()])
        .await?;
    store.set(&format!("{ns}.realm_acme"), "{}").await?;

    let mut keys = store.scan_keys(&format!("{ns}.realm_*_clients")).await?;
    keys.sort();

    assert_eq!(
        keys,
        vec![
            format!("{ns}.realm_acme_clients"),
            format!("{ns}.realm_beta_clients"),
        ]
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn list_read_on_string_is_wrong_type() -> anyhow::Result<()> {
    let (store, ns) = store().await?;
    let key = format!("{ns}.realm_acme_users");
    store.set(&key, "not a list").await?;

    let err = store.list_range(&key).await.unwrap_err();

    assert!(matches!(err, KvError::WrongType(_)));
    assert!(!err.is_unavailable());
    Ok(())
}
