//! Container-backed integration tests for the PostgreSQL user repository.
//!
//! Requires Docker; run with `cargo test -p domain_users -- --ignored`.

use domain_users::{PgUserRepository, Role, User, UserError, UserRepository};
use test_utils::{TestDataBuilder, TestDatabase};

fn user(email: &str, role: Role) -> User {
    User::new(
        "tester".to_string(),
        email.to_string(),
        "argon2-hash-placeholder".to_string(),
        role,
    )
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_fetch_round_trip() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection.clone());
    let data = TestDataBuilder::from_test_name("create_and_fetch");

    let created = repo
        .create(user(&data.email("alice"), Role::Customer))
        .await
        .unwrap();

    let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, created.email);

    let by_email = repo.get_by_email(&created.email).await.unwrap();
    assert!(by_email.is_some());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_email_enforced_by_schema() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection.clone());
    let data = TestDataBuilder::from_test_name("unique_email");
    let email = data.email("dup");

    repo.create(user(&email, Role::Customer)).await.unwrap();

    let result = repo.create(user(&email, Role::Customer)).await;
    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_find_admin_and_reset_token_lookup() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection.clone());
    let data = TestDataBuilder::from_test_name("admin_lookup");

    assert!(repo.find_admin().await.unwrap().is_none());

    let mut admin = user(&data.email("admin"), Role::Admin);
    admin.reset_token = Some("reset-token-123".to_string());
    repo.create(admin).await.unwrap();

    assert!(repo.find_admin().await.unwrap().is_some());
    assert!(repo
        .get_by_reset_token("reset-token-123")
        .await
        .unwrap()
        .is_some());
    assert!(repo.get_by_reset_token("other").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_and_delete() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection.clone());
    let data = TestDataBuilder::from_test_name("update_delete");

    let mut created = repo
        .create(user(&data.email("mutable"), Role::Customer))
        .await
        .unwrap();

    created.is_verified = true;
    created.username = "renamed".to_string();
    let updated = repo.update(created.clone()).await.unwrap();
    assert!(updated.is_verified);
    assert_eq!(updated.username, "renamed");

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
}
