use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{
    db::Database,
    domain::AdminUser,
    error::{AppError, Result},
    repository::AdminRepository,
};

#[derive(FromRow)]
struct AdminRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

pub struct SqliteAdminRepository {
    db: Database,
}

impl SqliteAdminRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_admin(row: AdminRow) -> AdminUser {
        AdminUser {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        let row: Option<AdminRow> = self
            .db
            .fetch_one(
                "SELECT id, username, password_hash, created_at FROM admin_users WHERE username = ?",
                &[username.into()],
            )
            .await?;

        Ok(row.map(Self::row_to_admin))
    }

    async fn any_exists(&self) -> Result<bool> {
        let row: Option<(i64,)> = self
            .db
            .fetch_one("SELECT id FROM admin_users LIMIT 1", &[])
            .await?;

        Ok(row.is_some())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser> {
        let now = Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string();

        self.db
            .execute(
                "INSERT INTO admin_users (username, password_hash, created_at) VALUES (?, ?, ?)",
                &[username.into(), password_hash.into(), now.into()],
            )
            .await?;

        self.find_by_username(username).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created admin".to_string())
        })
    }

    async fn update_password_hash(&self, username: &str, password_hash: &str) -> Result<bool> {
        let result = self
            .db
            .execute(
                "UPDATE admin_users SET password_hash = ? WHERE username = ?",
                &[password_hash.into(), username.into()],
            )
            .await?;

        Ok(result.rows_affected > 0)
    }
}
