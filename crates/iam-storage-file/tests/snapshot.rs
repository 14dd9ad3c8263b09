//! Snapshot backend tests over JSON files on disk.

use std::io::Write;
use std::sync::Arc;

use iam_storage::{ClientProvider, RealmProvider, Repository, StorageError, UserProvider};
use iam_storage_file::FileRepository;
use tempfile::NamedTempFile;
use uuid::Uuid;

const ALICE_ID: &str = "667ff6a7-3f6b-449b-a217-6fc5d9ac0723";
const WEBAPP_ID: &str = "d4dc483d-7d0d-4d2e-a0a0-2d34b55e5a14";

fn server_data() -> serde_json::Value {
    serde_json::json!({
        "realms": [
            {
                "name": "myapp",
                "token_expiration": 330,
                "refresh_expiration": 200,
                "clients": [{
                    "type": "confidential",
                    "id": WEBAPP_ID,
                    "name": "webapp",
                    "auth": {"type": 1, "value": "fb6Z4RsOadVycQoeQiN57xpu8w8wplYz"}
                }],
                "users": [{
                    "info": {"sub": ALICE_ID, "preferred_username": "alice", "email_verified": false},
                    "credentials": {"password": "1s2d3f4g90xs"}
                }]
            },
            {
                "name": "MyApp",
                "token_expiration": 60,
                "refresh_expiration": 30
            }
        ]
    })
}

fn write_snapshot(value: &serde_json::Value) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    file.flush()?;
    Ok(file)
}

async fn load() -> anyhow::Result<(NamedTempFile, FileRepository)> {
    let file = write_snapshot(&server_data())?;
    let repo = FileRepository::load(file.path()).await?;
    Ok((file, repo))
}

#[tokio::test]
async fn reads_embedded_members() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    let realm = repo.get_realm("myapp").await?;
    assert_eq!(realm.token_expiration, 330);
    assert_eq!(realm.clients.len(), 1);

    let client = repo.get_client_from_realm("myapp", "webapp").await?;
    assert_eq!(client.id, Uuid::parse_str(WEBAPP_ID)?);
    assert_eq!(repo.get_client("webapp").await?, client);

    let alice = repo
        .get_user_from_realm_by_id("myapp", Uuid::parse_str(ALICE_ID)?)
        .await?;
    assert_eq!(alice.username(), "alice");
    assert_eq!(repo.get_users_from_realm("myapp").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn lookups_are_case_sensitive() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    assert_eq!(repo.get_realm("myapp").await?.token_expiration, 330);
    assert_eq!(repo.get_realm("MyApp").await?.token_expiration, 60);
    assert!(repo.get_realm("MYAPP").await.unwrap_err().is_not_found());
    assert!(repo.get_user_from_realm("myapp", "Alice").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn missing_lookups_fail() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    assert!(repo.get_realm("doesNotExist").await.unwrap_err().is_not_found());
    assert!(repo.get_clients_from_realm("doesNotExist").await.unwrap_err().is_not_found());
    assert!(matches!(
        repo.get_client_from_realm("MyApp", "webapp").await.unwrap_err(),
        StorageError::NotMember { .. }
    ));
    assert!(matches!(
        repo.get_user_from_realm_by_id("myapp", Uuid::new_v4()).await.unwrap_err(),
        StorageError::NotFoundById { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();

    let err = FileRepository::load(dir.path().join("absent.json"))
        .await
        .err()
        .unwrap();

    assert!(err.is_unavailable());
}

#[tokio::test]
async fn malformed_file_is_rejected() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"{\"realms\": [")?;

    let err = FileRepository::load(file.path()).await.err().unwrap();

    assert!(matches!(err, StorageError::Malformed { entity_type: "ServerData", .. }));
    Ok(())
}

#[tokio::test]
async fn failed_reload_keeps_snapshot() -> anyhow::Result<()> {
    let (file, repo) = load().await?;

    std::fs::write(file.path(), b"not json")?;
    assert!(repo.reload().await.is_err());

    assert_eq!(repo.get_realm("myapp").await?.token_expiration, 330);
    Ok(())
}

#[tokio::test]
async fn reload_swaps_snapshot() -> anyhow::Result<()> {
    let (file, repo) = load().await?;
    let before = repo.snapshot();

    let mut data = server_data();
    data["realms"][0]["token_expiration"] = serde_json::json!(900);
    std::fs::write(file.path(), serde_json::to_vec(&data)?)?;
    repo.reload().await?;

    assert_eq!(repo.get_realm("myapp").await?.token_expiration, 900);
    assert_eq!(before.realm("myapp").map(|r| r.token_expiration), Some(330));
    Ok(())
}

#[tokio::test]
async fn in_memory_repository_cannot_reload() {
    let repo = FileRepository::from_data(iam_model::ServerData::default());

    assert!(repo.reload().await.is_err());
    assert!(repo.source().is_none());
}

#[tokio::test]
async fn membership_changes_keep_entities() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    repo.delete_realm_client("myapp", "webapp").await?;
    assert!(repo.get_clients_from_realm("myapp").await?.is_empty());
    assert!(repo.get_client("webapp").await.is_ok());

    repo.add_client_to_realm("MyApp", "webapp").await?;
    repo.add_client_to_realm("MyApp", "webapp").await?;
    assert_eq!(repo.get_clients_from_realm("MyApp").await?.len(), 1);
    assert!(repo.get_clients_from_realm("myapp").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_realm_keeps_members_reachable() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    repo.add_user_to_realm("MyApp", "alice").await?;
    repo.delete_realm("myapp").await?;

    assert!(repo.get_realm("myapp").await.unwrap_err().is_not_found());
    assert_eq!(repo.get_user_from_realm("MyApp", "alice").await?.username(), "alice");
    assert_eq!(repo.get_client("webapp").await?.id, Uuid::parse_str(WEBAPP_ID)?);
    assert!(repo.delete_realm("myapp").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn entity_deletion_cascades() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;

    repo.delete_user("alice").await?;

    assert!(repo.get_user("alice").await.unwrap_err().is_not_found());
    assert!(repo.get_users_from_realm("myapp").await?.is_empty());
    assert!(repo.delete_user("alice").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn writes_stay_in_memory() -> anyhow::Result<()> {
    let (file, repo) = load().await?;
    let original = std::fs::read(file.path())?;

    repo.create_realm(br#"{"name": "beta", "token_expiration": 10, "refresh_expiration": 5}"#)
        .await?;
    let client_id = Uuid::new_v4();
    repo.create_client(
        format!(r#"{{"type": "public", "id": "{client_id}", "name": "cli"}}"#).as_bytes(),
    )
    .await?;
    repo.add_client_to_realm("beta", "cli").await?;

    assert_eq!(repo.get_client_from_realm("beta", "cli").await?.id, client_id);
    assert_eq!(std::fs::read(file.path())?, original);

    let err = repo
        .create_realm(br#"{"name": "beta", "token_expiration": 1, "refresh_expiration": 1}"#)
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
    Ok(())
}

#[tokio::test]
async fn updates_replace_embedded_copies() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;
    let payload = format!(
        r#"{{"type": "public", "id": "{WEBAPP_ID}", "name": "webapp", "auth": {{"type": 1, "value": ""}}}}"#
    );

    repo.update_client("webapp", payload.as_bytes()).await?;

    assert!(repo.get_client_from_realm("myapp", "webapp").await?.is_public());

    let renamed = format!(r#"{{"id": "{WEBAPP_ID}", "name": "other"}}"#);
    let err = repo.update_client("webapp", renamed.as_bytes()).await.unwrap_err();
    assert!(matches!(err, StorageError::RenameRejected { .. }));

    let realm = repo
        .update_realm("myapp", br#"{"name": "myapp", "token_expiration": 1, "refresh_expiration": 2}"#)
        .await?;
    assert_eq!(realm.token_expiration, 1);
    assert_eq!(realm.clients.len(), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_readers_during_writes() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;
    let repo: Arc<dyn Repository> = Arc::new(repo);

    let writer = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            for i in 0..50 {
                let payload = format!(
                    r#"{{"info": {{"sub": "{}", "preferred_username": "user{i}"}}}}"#,
                    Uuid::new_v4()
                );
                repo.create_user(payload.as_bytes()).await?;
                repo.add_user_to_realm("MyApp", &format!("user{i}")).await?;
            }
            Ok::<_, StorageError>(())
        })
    };

    for _ in 0..50 {
        let realm = repo.get_realm_with_members("myapp").await?;
        assert_eq!(realm.users.len(), 1);
    }
    writer.await??;

    assert_eq!(repo.get_users_from_realm("MyApp").await?.len(), 50);
    Ok(())
}

#[tokio::test]
async fn create_cannot_change_a_stored_id() -> anyhow::Result<()> {
    let (_file, repo) = load().await?;
    let other = Uuid::new_v4();

    let err = repo
        .create_user(format!(r#"{{"info": {{"sub": "{other}", "preferred_username": "alice"}}}}"#).as_bytes())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::RenameRejected { entity_type: "User", .. }));

    let err = repo
        .create_client(format!(r#"{{"type": "public", "id": "{other}", "name": "webapp"}}"#).as_bytes())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::RenameRejected { entity_type: "Client", .. }));

    let embedded = format!(
        r#"{{"name": "beta", "token_expiration": 1, "refresh_expiration": 1,
            "users": [{{"info": {{"sub": "{other}", "preferred_username": "alice"}}}}]}}"#
    );
    let err = repo.create_realm(embedded.as_bytes()).await.unwrap_err();
    assert!(matches!(err, StorageError::RenameRejected { .. }));
    assert!(repo.get_realm("beta").await.unwrap_err().is_not_found());

    let alice = repo
        .get_user_from_realm_by_id("myapp", Uuid::parse_str(ALICE_ID)?)
        .await?;
    assert_eq!(alice.username(), "alice");
    Ok(())
}
