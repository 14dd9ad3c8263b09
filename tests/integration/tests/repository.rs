//! Repository contract over Redis, assembled from configuration.

use std::sync::Arc;

use fred::prelude::*;
use iam_integration_tests::{client, realm, redis_source, user};
use iam_kv_redis::{RedisConfig, RedisStore};
use iam_model::ExtendedIdentifier;
use iam_storage::{ClientProvider, RealmProvider, Repository, StorageError, UserProvider};
use iam_storage_kv::{KeySpace, KvRepository};
use uuid::Uuid;

async fn repository() -> anyhow::Result<Arc<dyn Repository>> {
    let source = redis_source().await;
    iam_bootstrap::build_repository(&source).await
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn realm_lifecycle() -> anyhow::Result<()> {
    let repo = repository().await?;
    let webapp = Uuid::new_v4();
    let alice = Uuid::new_v4();

    repo.create_realm(&realm("acme", 300)).await?;
    repo.create_client(&client(webapp, "webapp")).await?;
    repo.create_user(&user(alice, "alice")).await?;
    repo.add_client_to_realm("acme", "webapp").await?;
    repo.add_user_to_realm("acme", "alice").await?;

    let full = repo.get_realm_with_members("acme").await?;
    assert_eq!(full.token_expiration, 300);
    assert_eq!(full.clients.len(), 1);
    assert_eq!(full.clients[0].id, webapp);
    assert_eq!(full.users[0].id(), alice);
    assert_eq!(repo.get_user_from_realm_by_id("acme", alice).await?.username(), "alice");

    repo.delete_realm("acme").await?;
    assert!(repo.get_realm("acme").await.unwrap_err().is_not_found());
    assert!(repo.get_clients_from_realm("acme").await.unwrap_err().is_not_found());
    assert_eq!(repo.get_client("webapp").await?.id, webapp);
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn embedded_members_are_cascaded() -> anyhow::Result<()> {
    let repo = repository().await?;
    let bob = Uuid::new_v4();
    let payload = format!(
        r#"{{"name":"beta","token_expiration":60,"refresh_expiration":30,
            "users":[{{"info":{{"sub":"{bob}","preferred_username":"bob"}}}}]}}"#
    );

    repo.create_realm(payload.as_bytes()).await?;

    assert!(repo.get_realm("beta").await?.users.is_empty());
    assert_eq!(repo.get_user_from_realm("beta", "bob").await?.id(), bob);
    assert!(repo.create_realm(&realm("beta", 1)).await.unwrap_err().is_duplicate());
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn entity_deletion_cleans_edges() -> anyhow::Result<()> {
    let repo = repository().await?;
    let carol = Uuid::new_v4();
    repo.create_user(&user(carol, "carol")).await?;
    for name in ["one", "two"] {
        repo.create_realm(&realm(name, 60)).await?;
        repo.add_user_to_realm(name, "carol").await?;
    }

    repo.delete_user("carol").await?;

    for name in ["one", "two"] {
        assert!(repo.get_users_from_realm(name).await?.is_empty());
    }
    assert!(repo.get_user("carol").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_adds_are_not_lost() -> anyhow::Result<()> {
    let repo = repository().await?;
    repo.create_realm(&realm("busy", 60)).await?;
    for i in 0..20 {
        repo.create_client(&client(Uuid::new_v4(), &format!("c{i}"))).await?;
    }

    let adds = (0..20).map(|i| {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move { repo.add_client_to_realm("busy", &format!("c{i}")).await })
    });
    for result in futures::future::join_all(adds).await {
        result??;
    }

    assert_eq!(repo.get_clients_from_realm("busy").await?.len(), 20);
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn legacy_lists_and_dangling_edges() -> anyhow::Result<()> {
    let source = redis_source().await;
    let (host, port) = source.redis_address()?;
    let store = RedisStore::new(RedisConfig::new().host(host).port(port)).await?;
    let keys = KeySpace::new(source.options.namespace.clone().unwrap_or_default())?;
    let edge = keys.realm_users("acme");
    let pool = store.pool().clone();
    let repo = KvRepository::with_keys(Arc::new(store), keys);

    let dave = Uuid::new_v4();
    let erin = Uuid::new_v4();
    repo.create_realm(&realm("acme", 60)).await?;
    repo.create_user(&user(dave, "dave")).await?;
    repo.create_user(&user(erin, "erin")).await?;
    for (id, name) in [(dave, "dave"), (erin, "erin")] {
        let entry = serde_json::to_string(&[ExtendedIdentifier::new(id, name)])?;
        pool.rpush::<i64, _, _>(edge.as_str(), entry).await?;
    }

    assert_eq!(repo.get_users_from_realm("acme").await?.len(), 2);

    let ghost = serde_json::to_string(&[ExtendedIdentifier::new(Uuid::new_v4(), "ghost")])?;
    pool.rpush::<i64, _, _>(edge.as_str(), ghost).await?;

    let err = repo.get_users_from_realm("acme").await.unwrap_err();
    assert!(matches!(err, StorageError::Inconsistent { .. }));
    assert_eq!(repo.get_user_from_realm("acme", "dave").await?.id(), dave);
    Ok(())
}
