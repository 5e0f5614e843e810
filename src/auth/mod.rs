use std::sync::Arc;

use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};

use crate::{
    db::Database,
    domain::{flag_value, parse_flag, FORCE_PASSWORD_CHANGE},
    error::{AppError, Result},
    repository::{AdminRepository, SettingsRepository, SqliteAdminRepository, SqliteSettingsRepository},
};

pub mod session;

use session::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "session";

/// bcrypt ignores everything past the first 72 bytes of its input.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

fn bcrypt_secret(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(BCRYPT_MAX_PASSWORD_BYTES)]
}

/// Hash a password for storage. Input is cut to 72 bytes first so that the
/// truncation bcrypt would do anyway is explicit and identical on verify.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(bcrypt_secret(password), cost)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(bcrypt_secret(password), password_hash)?)
}

pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
    settings: Arc<dyn SettingsRepository>,
    session_store: SessionStore,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        Self {
            admins: Arc::new(SqliteAdminRepository::new(db.clone())),
            settings: Arc::new(SqliteSettingsRepository::new(db.clone())),
            session_store: SessionStore::new(db),
            bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash_password(password, self.bcrypt_cost)
    }

    /// First-run setup. Creates the default admin when no admin exists and
    /// forces a password change on its first login. Returns whether the
    /// account was created.
    pub async fn bootstrap(&self, username: &str, default_password: &str) -> Result<bool> {
        if self.admins.any_exists().await? {
            if self.settings.get(FORCE_PASSWORD_CHANGE).await?.is_none() {
                self.settings.set(FORCE_PASSWORD_CHANGE, flag_value(false)).await?;
            }
            return Ok(false);
        }

        let password_hash = self.hash_password(default_password)?;
        self.admins.create(username, &password_hash).await?;
        self.settings.set(FORCE_PASSWORD_CHANGE, flag_value(true)).await?;

        tracing::warn!(
            "Created default admin account '{}'; its password must be changed on first login",
            username
        );
        Ok(true)
    }

    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let Some(admin) = self.admins.find_by_username(username).await? else {
            return Ok(false);
        };

        match verify_password(password, &admin.password_hash) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!("Stored password hash for '{}' is unreadable: {}", username, e);
                Ok(false)
            }
        }
    }

    pub async fn change_password(&self, username: &str, new_password: &str) -> Result<()> {
        let password_hash = self.hash_password(new_password)?;

        if !self.admins.update_password_hash(username, &password_hash).await? {
            return Err(AppError::NotFound(format!("Admin not found: {}", username)));
        }

        self.settings.set(FORCE_PASSWORD_CHANGE, flag_value(false)).await?;
        tracing::info!("Password changed for '{}'", username);
        Ok(())
    }

    pub async fn is_force_password_change(&self) -> Result<bool> {
        Ok(self
            .settings
            .get(FORCE_PASSWORD_CHANGE)
            .await?
            .map(|value| parse_flag(&value))
            .unwrap_or(false))
    }

    pub async fn create_session(&self, username: &str, duration_hours: i64) -> Result<(Session, String)> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(duration_hours);

        let session = self.session_store
            .create(username, &token, expires_at)
            .await?;

        Ok((session, token))
    }

    pub async fn validate_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_store.find_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    /// Log out every other session of `username`, keeping the one behind `keep_token`.
    pub async fn revoke_other_sessions(&self, username: &str, keep_token: &str) -> Result<u64> {
        self.session_store.delete_others(username, keep_token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str, secure: bool, duration_hours: i64) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(secure)
            .max_age(cookie::time::Duration::hours(duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("my_secure_password", TEST_COST).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("my_secure_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_long_passwords_are_truncated_to_72_bytes() {
        let base = "x".repeat(72);
        let hash = hash_password(&format!("{}first-suffix", base), TEST_COST).unwrap();
        assert!(verify_password(&format!("{}other-suffix", base), &hash).unwrap());
        assert!(verify_password(&base, &hash).unwrap());
        assert!(!verify_password(&"x".repeat(71), &hash).unwrap());
    }

    #[test]
    fn test_truncation_counts_bytes_not_chars() {
        // 36 two-byte characters fill the 72 byte budget exactly.
        let accented = "é".repeat(36);
        assert_eq!(bcrypt_secret(&format!("{}tail", accented)).len(), 72);
        assert_eq!(bcrypt_secret("short"), b"short");
    }

    #[test]
    fn test_token_generation() {
        let token = generate_token();
        assert_eq!(token.len(), 64); // 32 bytes = 64 hex chars
        assert_ne!(token, generate_token());
    }
}
