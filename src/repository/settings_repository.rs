use async_trait::async_trait;

use crate::{
    db::Database,
    error::Result,
    repository::SettingsRepository,
};

pub struct SqliteSettingsRepository {
    db: Database,
}

impl SqliteSettingsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = self
            .db
            .fetch_one("SELECT value FROM app_settings WHERE key = ?", &[key.into()])
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                r#"
                INSERT INTO app_settings (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                &[key.into(), value.into()],
            )
            .await?;

        Ok(())
    }
}
