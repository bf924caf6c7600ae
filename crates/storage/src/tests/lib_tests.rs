use super::*;

fn new_user(email: &str, name: &str, age: u32) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: name.to_string(),
        age,
    }
}

#[tokio::test]
async fn creates_and_lists_users_in_id_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = storage
        .create_user(&new_user("a@x.com", "Ana", 25))
        .await
        .expect("ana");
    let bob = storage
        .create_user(&new_user("b@x.com", "Bob", 30))
        .await
        .expect("bob");
    assert!(bob.id > ana.id);

    let users = storage.list_users().await.expect("list");
    assert_eq!(users, vec![ana, bob]);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .create_user(&new_user("a@x.com", "Ana", 25))
        .await
        .expect("first");
    storage
        .create_user(&new_user("a@x.com", "Other", 40))
        .await
        .expect_err("unique email");
    assert_eq!(storage.list_users().await.expect("list").len(), 1);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = storage
        .create_user(&new_user("a@x.com", "Ana", 25))
        .await
        .expect("ana");

    let updated = storage
        .update_user(
            ana.id,
            &UserPatch {
                age: Some(26),
                ..UserPatch::default()
            },
        )
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.email, "a@x.com");
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.age, 26);

    let missing = storage
        .update_user(UserId(999), &UserPatch::default())
        .await
        .expect("update missing");
    assert!(missing.is_none());
}

#[tokio::test]
async fn delete_reports_whether_row_existed() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = storage
        .create_user(&new_user("a@x.com", "Ana", 25))
        .await
        .expect("ana");

    assert!(storage.delete_user(ana.id).await.expect("delete"));
    assert!(!storage.delete_user(ana.id).await.expect("delete again"));
    assert!(storage.get_user(ana.id).await.expect("get").is_none());
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("user_admin_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("users.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
