use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewUser, UserId, UserRecord},
    protocol::ErrorBody,
};
use tracing::debug;
use url::Url;

use crate::error::RemoteError;

/// Remote side of the user collection.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError>;
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, RemoteError>;
    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, RemoteError>;
    async fn delete_user(&self, user_id: UserId) -> Result<(), RemoteError>;
}

/// `UsersApi` over the `/usuarios` REST resource.
pub struct HttpUsersApi {
    http: Client,
    base_url: String,
}

impl HttpUsersApi {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid api base url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("api base url must use http or https, got '{}'", parsed.scheme());
        }
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/usuarios", self.base_url)
    }

    fn user_url(&self, user_id: UserId) -> String {
        format!("{}/usuarios/{}", self.base_url, user_id.0)
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        let response = self
            .http
            .get(self.users_url())
            .send()
            .await
            .map_err(RemoteError::transport)?;
        decode(response).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, RemoteError> {
        let response = self
            .http
            .post(self.users_url())
            .json(user)
            .send()
            .await
            .map_err(RemoteError::transport)?;
        decode(response).await
    }

    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, RemoteError> {
        let response = self
            .http
            .put(self.user_url(user.id))
            .json(&NewUser::from(user))
            .send()
            .await
            .map_err(RemoteError::transport)?;
        decode(response).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.user_url(user_id))
            .send()
            .await
            .map_err(RemoteError::transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    debug!(status = status.as_u16(), ?message, "users api: request rejected");
    Err(RemoteError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
