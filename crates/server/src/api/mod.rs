use serde_json::Value;
use shared::{
    domain::{NewUser, UserId, UserRecord},
    error::{ApiError, ErrorCode},
    protocol::{DeleteResponse, UserPatch, UserPayload},
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn users_route() -> &'static str {
    "/api/usuarios"
}

pub fn user_route() -> &'static str {
    "/api/usuarios/:user_id"
}

pub async fn list_users(ctx: &ApiContext) -> Result<Vec<UserRecord>, ApiError> {
    ctx.storage.list_users().await.map_err(internal)
}

pub async fn get_user(ctx: &ApiContext, user_id: UserId) -> Result<UserRecord, ApiError> {
    ctx.storage
        .get_user(user_id)
        .await
        .map_err(internal)?
        .ok_or_else(user_not_found)
}

pub async fn create_user(
    ctx: &ApiContext,
    payload: Option<UserPayload>,
) -> Result<UserRecord, ApiError> {
    let payload = require_payload(payload)?;

    let email = payload.email.filter(|v| !v.is_empty());
    let name = payload.name.filter(|v| !v.is_empty());
    let (Some(email), Some(name), Some(age)) = (email, name, payload.age) else {
        return Err(ApiError::validation("missing required fields"));
    };
    let age = parse_age(&age)?;

    let user = ctx
        .storage
        .create_user(&NewUser { email, name, age })
        .await
        .map_err(|e| ApiError::validation(format!("failed to add user: {e}")))?;
    info!(user_id = user.id.0, "users: created");
    Ok(user)
}

pub async fn update_user(
    ctx: &ApiContext,
    user_id: UserId,
    payload: Option<UserPayload>,
) -> Result<UserRecord, ApiError> {
    let payload = require_payload(payload)?;
    let patch = UserPatch {
        email: payload.email,
        name: payload.name,
        age: payload.age.as_ref().map(parse_age).transpose()?,
    };

    let user = ctx
        .storage
        .update_user(user_id, &patch)
        .await
        .map_err(|e| ApiError::validation(format!("failed to update user: {e}")))?
        .ok_or_else(user_not_found)?;
    info!(user_id = user.id.0, "users: updated");
    Ok(user)
}

pub async fn delete_user(ctx: &ApiContext, user_id: UserId) -> Result<DeleteResponse, ApiError> {
    let removed = ctx.storage.delete_user(user_id).await.map_err(internal)?;
    if !removed {
        return Err(user_not_found());
    }
    info!(user_id = user_id.0, "users: deleted");
    Ok(DeleteResponse {
        message: "user deleted".to_string(),
    })
}

fn require_payload(payload: Option<UserPayload>) -> Result<UserPayload, ApiError> {
    payload
        .filter(|p| p.email.is_some() || p.name.is_some() || p.age.is_some())
        .ok_or_else(|| ApiError::validation("no data provided"))
}

/// Ages must be strictly positive JSON integers.
fn parse_age(value: &Value) -> Result<u32, ApiError> {
    value
        .as_u64()
        .filter(|age| *age > 0)
        .and_then(|age| u32::try_from(age).ok())
        .ok_or_else(|| ApiError::validation("age must be a positive integer"))
}

fn user_not_found() -> ApiError {
    ApiError::not_found("user not found")
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
