use std::sync::Arc;

use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

use crate::error::RemoteError;

#[derive(Clone, Default)]
struct ServerState {
    users: Arc<Mutex<Vec<UserRecord>>>,
}

async fn list(State(state): State<ServerState>) -> Json<Vec<UserRecord>> {
    Json(state.users.lock().await.clone())
}

async fn create(
    State(state): State<ServerState>,
    Json(user): Json<NewUser>,
) -> axum::response::Response {
    let mut users = state.users.lock().await;
    if users.iter().any(|u| u.email == user.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "validation", "message": "failed to add user: duplicate email" })),
        )
            .into_response();
    }
    let record = user.with_id(UserId(users.len() as i64 + 1));
    users.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Json(user): Json<NewUser>,
) -> axum::response::Response {
    let mut users = state.users.lock().await;
    match users.iter_mut().find(|u| u.id == UserId(user_id)) {
        Some(slot) => {
            *slot = user.with_id(UserId(user_id));
            Json(slot.clone()).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "user not found" })),
        )
            .into_response(),
    }
}

async fn delete(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> axum::response::Response {
    let mut users = state.users.lock().await;
    let before = users.len();
    users.retain(|u| u.id != UserId(user_id));
    if users.len() == before {
        // Bare status with a non-JSON body, like a proxy in front of the service.
        return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
    }
    Json(json!({ "message": "user deleted" })).into_response()
}

async fn broken_list() -> &'static str {
    "not json"
}

async fn spawn_users_server() -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/usuarios", get(list).post(create))
        .route("/api/usuarios/:user_id", axum::routing::put(update).delete(delete))
        .route("/broken/usuarios", get(broken_list))
        .with_state(ServerState::default());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn draft(email: &str, name: &str, age: u32) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: name.to_string(),
        age,
    }
}

#[test]
fn rejects_non_http_base_urls() {
    assert!(HttpUsersApi::new("ftp://example.com/api").is_err());
    assert!(HttpUsersApi::new("not a url").is_err());

    let api = HttpUsersApi::new("http://127.0.0.1:5000/api/").expect("valid url");
    assert_eq!(api.base_url(), "http://127.0.0.1:5000/api");
    assert_eq!(api.user_url(UserId(7)), "http://127.0.0.1:5000/api/usuarios/7");
}

#[tokio::test]
async fn crud_round_trip_against_rest_resource() {
    let server = spawn_users_server().await.expect("spawn server");
    let api = HttpUsersApi::new(&format!("{server}/api")).expect("client");

    assert!(api.list_users().await.expect("list").is_empty());

    let bob = api
        .create_user(&draft("b@x.com", "Bob", 30))
        .await
        .expect("create");
    assert_eq!(bob.id, UserId(1));
    assert_eq!(bob.name, "Bob");

    let updated = api
        .update_user(&UserRecord {
            age: 31,
            ..bob.clone()
        })
        .await
        .expect("update");
    assert_eq!(updated.age, 31);
    assert_eq!(api.list_users().await.expect("list"), vec![updated]);

    api.delete_user(bob.id).await.expect("delete");
    assert!(api.list_users().await.expect("list").is_empty());
}

#[tokio::test]
async fn server_message_is_carried_in_rejection() {
    let server = spawn_users_server().await.expect("spawn server");
    let api = HttpUsersApi::new(&format!("{server}/api")).expect("client");

    api.create_user(&draft("b@x.com", "Bob", 30))
        .await
        .expect("create");
    let err = api
        .create_user(&draft("b@x.com", "Other Bob", 40))
        .await
        .expect_err("duplicate");
    assert_eq!(
        err,
        RemoteError::Rejected {
            status: 400,
            message: Some("failed to add user: duplicate email".to_string()),
        }
    );

    let err = api
        .update_user(&draft("z@x.com", "Zed", 1).with_id(UserId(99)))
        .await
        .expect_err("missing");
    assert_eq!(err.operator_reason(), "user not found");
}

#[tokio::test]
async fn rejection_without_json_body_has_no_message() {
    let server = spawn_users_server().await.expect("spawn server");
    let api = HttpUsersApi::new(&format!("{server}/api")).expect("client");

    let err = api.delete_user(UserId(5)).await.expect_err("missing");
    assert_eq!(
        err,
        RemoteError::Rejected {
            status: 502,
            message: None,
        }
    );
    assert_eq!(err.operator_reason(), "request rejected with status 502");
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = spawn_users_server().await.expect("spawn server");
    let api = HttpUsersApi::new(&format!("{server}/broken")).expect("client");

    let err = api.list_users().await.expect_err("not json");
    assert!(matches!(err, RemoteError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpUsersApi::new(&format!("http://{addr}/api")).expect("client");
    let err = api.list_users().await.expect_err("closed port");
    assert!(matches!(err, RemoteError::Transport(_)), "{err:?}");
}
