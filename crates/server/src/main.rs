use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{UserId, UserRecord},
    error::{ApiError, ErrorCode},
    protocol::{DeleteResponse, UserPayload},
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info, warn};

mod api;
mod app_state;
mod config;

use api::{user_route, users_route, ApiContext};
use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = settings.database_url;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(users_route(), get(http_list_users).post(http_create_user))
        .route(
            user_route(),
            get(http_get_user)
                .put(http_update_user)
                .delete(http_delete_user),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        warn!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_list_users(State(state): State<Arc<AppState>>) -> HttpResult<Json<Vec<UserRecord>>> {
    api::list_users(&state.api).await.map(Json).map_err(reject)
}

async fn http_get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> HttpResult<Json<UserRecord>> {
    api::get_user(&state.api, UserId(user_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<UserRecord>)> {
    let user = api::create_user(&state.api, payload.ok().map(|Json(p)| p))
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn http_update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> HttpResult<Json<UserRecord>> {
    api::update_user(&state.api, UserId(user_id), payload.ok().map(|Json(p)| p))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> HttpResult<Json<DeleteResponse>> {
    api::delete_user(&state.api, UserId(user_id))
        .await
        .map(Json)
        .map_err(reject)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(reason = %err.message, "users api failure");
    }
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
