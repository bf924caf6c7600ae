use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{NewUser, UserId, UserRecord},
    protocol::UserPatch,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own database.
        let max_connections = if is_in_memory(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query("SELECT id, email, name, age FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed to list users")?;
        rows.iter().map(user_from_row).collect()
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT id, email, name, age FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<UserRecord> {
        let row = sqlx::query(
            "INSERT INTO users (email, name, age) VALUES (?, ?, ?)
             RETURNING id, email, name, age",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(i64::from(user.age))
        .fetch_one(&self.pool)
        .await?;
        user_from_row(&row)
    }

    /// Applies only the fields present in `patch`. Returns `None` when the
    /// user does not exist.
    pub async fn update_user(
        &self,
        user_id: UserId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "UPDATE users
             SET email = COALESCE(?, email),
                 name  = COALESCE(?, name),
                 age   = COALESCE(?, age)
             WHERE id = ?
             RETURNING id, email, name, age",
        )
        .bind(patch.email.as_deref())
        .bind(patch.name.as_deref())
        .bind(patch.age.map(i64::from))
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    /// Returns whether a row was removed.
    pub async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        let removed = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<UserRecord> {
    let age: i64 = row.try_get("age")?;
    Ok(UserRecord {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        age: u32::try_from(age).with_context(|| format!("stored age {age} is out of range"))?,
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
