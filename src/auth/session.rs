use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{db::Database, error::Result};

/// Timestamps are stored as fixed-width text so they compare correctly in SQL.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionRow {
    id: i64,
    username: String,
    token_hash: String,
    expires_at: NaiveDateTime,
    created_at: NaiveDateTime,
}

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        username: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        let token_hash = hash_token(token);
        let now = Utc::now();

        let result = self.db
            .execute(
                r#"
                INSERT INTO admin_sessions (username, token_hash, expires_at, created_at)
                VALUES (?, ?, ?, ?)
                "#,
                &[
                    username.into(),
                    token_hash.as_str().into(),
                    format_timestamp(expires_at).into(),
                    format_timestamp(now).into(),
                ],
            )
            .await?;

        Ok(Session {
            id: result.last_insert_id,
            username: username.to_string(),
            token_hash,
            expires_at,
            created_at: now,
        })
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Session>> {
        let row: Option<SessionRow> = self.db
            .fetch_one(
                r#"
                SELECT id, username, token_hash, expires_at, created_at
                FROM admin_sessions
                WHERE token_hash = ? AND expires_at > ?
                "#,
                &[hash_token(token).into(), format_timestamp(Utc::now()).into()],
            )
            .await?;

        Ok(row.map(|row| Session {
            id: row.id,
            username: row.username,
            token_hash: row.token_hash,
            expires_at: DateTime::from_naive_utc_and_offset(row.expires_at, Utc),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }))
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<()> {
        self.db
            .execute(
                "DELETE FROM admin_sessions WHERE token_hash = ?",
                &[hash_token(token).into()],
            )
            .await?;

        Ok(())
    }

    pub async fn delete_others(&self, username: &str, keep_token: &str) -> Result<u64> {
        let result = self.db
            .execute(
                "DELETE FROM admin_sessions WHERE username = ? AND token_hash <> ?",
                &[username.into(), hash_token(keep_token).into()],
            )
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result = self.db
            .execute(
                "DELETE FROM admin_sessions WHERE expires_at <= ?",
                &[format_timestamp(Utc::now()).into()],
            )
            .await?;

        Ok(result.rows_affected)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

fn hash_token(token: &str) -> String {
    use sha2::{Sha256, Digest};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hashing() {
        let token = "test_token";
        let hash1 = hash_token(token);
        let hash2 = hash_token(token);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, token);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_timestamp_format_sorts_as_text() {
        let earlier = DateTime::parse_from_rfc3339("2024-01-09T23:59:59Z").unwrap().with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2024-01-10T00:00:00Z").unwrap().with_timezone(&Utc);
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(format_timestamp(later), "2024-01-10T00:00:00");
    }
}
