use super::*;
use serde_json::json;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext { storage }
}

fn payload(value: Value) -> Option<UserPayload> {
    Some(serde_json::from_value(value).expect("payload"))
}

#[tokio::test]
async fn create_requires_every_field() {
    let ctx = setup().await;
    let err = create_user(&ctx, payload(json!({ "correoElectronico": "a@x.com", "edad": 20 })))
        .await
        .expect_err("missing name");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "missing required fields");

    let err = create_user(
        &ctx,
        payload(json!({ "correoElectronico": "", "nombre": "Ana", "edad": 20 })),
    )
    .await
    .expect_err("empty email");
    assert_eq!(err.message, "missing required fields");
}

#[tokio::test]
async fn create_rejects_empty_body() {
    let ctx = setup().await;
    let err = create_user(&ctx, None).await.expect_err("no body");
    assert_eq!(err.message, "no data provided");

    let err = create_user(&ctx, payload(json!({})))
        .await
        .expect_err("empty object");
    assert_eq!(err.message, "no data provided");
}

#[tokio::test]
async fn create_rejects_non_positive_or_non_integer_age() {
    let ctx = setup().await;
    for age in [json!(0), json!(-3), json!("30"), json!(12.5)] {
        let err = create_user(
            &ctx,
            payload(json!({ "correoElectronico": "a@x.com", "nombre": "Ana", "edad": age })),
        )
        .await
        .expect_err("bad age");
        assert_eq!(err.message, "age must be a positive integer");
    }
    assert!(list_users(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn duplicate_email_surfaces_storage_reason() {
    let ctx = setup().await;
    let body = json!({ "correoElectronico": "a@x.com", "nombre": "Ana", "edad": 25 });
    create_user(&ctx, payload(body.clone()))
        .await
        .expect("first");
    let err = create_user(&ctx, payload(body))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.starts_with("failed to add user: "), "{}", err.message);
}

#[tokio::test]
async fn update_is_partial_and_validates_age() {
    let ctx = setup().await;
    let ana = create_user(
        &ctx,
        payload(json!({ "correoElectronico": "a@x.com", "nombre": "Ana", "edad": 25 })),
    )
    .await
    .expect("create");

    let updated = update_user(&ctx, ana.id, payload(json!({ "nombre": "Ana Maria" })))
        .await
        .expect("update");
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.email, "a@x.com");
    assert_eq!(updated.age, 25);

    let err = update_user(&ctx, ana.id, payload(json!({ "edad": 0 })))
        .await
        .expect_err("bad age");
    assert_eq!(err.code, ErrorCode::Validation);

    let err = update_user(&ctx, UserId(404), payload(json!({ "edad": 3 })))
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_then_get_reports_not_found() {
    let ctx = setup().await;
    let ana = create_user(
        &ctx,
        payload(json!({ "correoElectronico": "a@x.com", "nombre": "Ana", "edad": 25 })),
    )
    .await
    .expect("create");

    delete_user(&ctx, ana.id).await.expect("delete");
    let err = get_user(&ctx, ana.id).await.expect_err("gone");
    assert_eq!(err.code, ErrorCode::NotFound);
    let err = delete_user(&ctx, ana.id).await.expect_err("already gone");
    assert_eq!(err.code, ErrorCode::NotFound);
}
