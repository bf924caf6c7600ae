use async_trait::async_trait;
use shared::domain::{NewUser, UserId, UserRecord};
use tokio::sync::Mutex;

use crate::{api::UsersApi, error::RemoteError};

/// In-process stand-in for the users service. Ids are assigned as the
/// current maximum id plus one.
#[derive(Default)]
pub struct LocalUsersApi {
    users: Mutex<Vec<UserRecord>>,
}

impl LocalUsersApi {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn with_sample_users() -> Self {
        Self::new(vec![
            UserRecord {
                id: UserId(1),
                email: "sample@example.com".to_string(),
                name: "Sample User".to_string(),
                age: 25,
            },
            UserRecord {
                id: UserId(2),
                email: "test@example.com".to_string(),
                name: "Test User".to_string(),
                age: 30,
            },
        ])
    }

    pub async fn snapshot(&self) -> Vec<UserRecord> {
        self.users.lock().await.clone()
    }
}

pub fn next_user_id(users: &[UserRecord]) -> UserId {
    UserId(users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1)
}

fn not_found() -> RemoteError {
    RemoteError::rejected(404, "user not found")
}

#[async_trait]
impl UsersApi for LocalUsersApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        Ok(self.snapshot().await)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, RemoteError> {
        let mut users = self.users.lock().await;
        let record = user.clone().with_id(next_user_id(&users));
        users.push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, RemoteError> {
        let mut users = self.users.lock().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(not_found)?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), RemoteError> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
