//! SQLite bot repository implementation.
//!
//! Implements `BotRepository` from `botweave-core` using sqlx with split
//! read/write pools.

use botweave_core::repository::BotRepository;
use botweave_types::bot::{BotConfig, BotKey, OwnerId};
use botweave_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `BotRepository`.
pub struct SqliteBotRepository {
    pool: DatabasePool,
}

impl SqliteBotRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain BotConfig.
struct BotRow {
    key: String,
    owner: String,
    name: String,
    prompt: String,
    usage_limit: i64,
    embed_url: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BotRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            key: row.try_get("key")?,
            owner: row.try_get("owner")?,
            name: row.try_get("name")?,
            prompt: row.try_get("prompt")?,
            usage_limit: row.try_get("usage_limit")?,
            embed_url: row.try_get("embed_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_config(self) -> Result<BotConfig, RepositoryError> {
        let key = self
            .key
            .parse::<BotKey>()
            .map_err(|e| RepositoryError::Query(format!("invalid bot key: {e}")))?;

        let usage_limit = u32::try_from(self.usage_limit)
            .map_err(|_| RepositoryError::Query("negative usage limit".to_string()))?;

        Ok(BotConfig {
            owner: OwnerId::new(self.owner),
            key,
            name: self.name,
            prompt: self.prompt,
            usage_limit,
            embed_url: self.embed_url,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl BotRepository for SqliteBotRepository {
    async fn create(&self, bot: &BotConfig) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO bots (key, owner, name, prompt, usage_limit, embed_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(bot.key.as_str())
        .bind(bot.owner.as_str())
        .bind(&bot.name)
        .bind(&bot.prompt)
        .bind(i64::from(bot.usage_limit))
        .bind(&bot.embed_url)
        .bind(format_datetime(&bot.created_at))
        .bind(format_datetime(&bot.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("bot key '{}' already exists", bot.key)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get(
        &self,
        owner: &OwnerId,
        key: &BotKey,
    ) -> Result<Option<BotConfig>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM bots WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let bot_row =
                    BotRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                // Keys are global; a key that exists under another owner is
                // an access violation, not a miss.
                if bot_row.owner != owner.as_str() {
                    return Err(RepositoryError::PermissionDenied);
                }
                Ok(Some(bot_row.into_config()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<BotConfig>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM bots WHERE owner = ? ORDER BY created_at ASC")
            .bind(owner.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                BotRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_config()
            })
            .collect()
    }

    async fn update(&self, bot: &BotConfig) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE bots SET name = ?, prompt = ?, usage_limit = ?, embed_url = ?, updated_at = ?
             WHERE key = ? AND owner = ?",
        )
        .bind(&bot.name)
        .bind(&bot.prompt)
        .bind(i64::from(bot.usage_limit))
        .bind(&bot.embed_url)
        .bind(format_datetime(&bot.updated_at))
        .bind(bot.key.as_str())
        .bind(bot.owner.as_str())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, key: &BotKey) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bots WHERE key = ? AND owner = ?")
            .bind(key.as_str())
            .bind(owner.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    fn bot(owner: &str, key: &str) -> BotConfig {
        BotConfig {
            owner: OwnerId::new(owner),
            key: key.parse().unwrap(),
            name: key.to_string(),
            prompt: "You are helpful.".to_string(),
            usage_limit: 50,
            embed_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        let owner = OwnerId::new("uid-1");
        repo.create(&bot("uid-1", "faq-bot")).await.unwrap();

        let found = repo
            .get(&owner, &"faq-bot".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "faq-bot");
        assert_eq!(found.usage_limit, 50);
    }

    #[tokio::test]
    async fn test_duplicate_key_conflicts() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        repo.create(&bot("uid-1", "faq-bot")).await.unwrap();
        let err = repo.create(&bot("uid-2", "faq-bot")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_owner_is_permission_denied() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        repo.create(&bot("uid-1", "faq-bot")).await.unwrap();
        let err = repo
            .get(&OwnerId::new("uid-2"), &"faq-bot".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_missing_bot_is_none() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        let found = repo
            .get(&OwnerId::new("uid-1"), &"ghost".parse().unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_scoped_to_owner() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        repo.create(&bot("uid-1", "bot-a")).await.unwrap();
        repo.create(&bot("uid-1", "bot-b")).await.unwrap();
        repo.create(&bot("uid-2", "bot-c")).await.unwrap();

        let bots = repo.list(&OwnerId::new("uid-1")).await.unwrap();
        assert_eq!(bots.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteBotRepository::new(pool);

        let owner = OwnerId::new("uid-1");
        let mut config = bot("uid-1", "faq-bot");
        repo.create(&config).await.unwrap();

        config.prompt = "Updated prompt.".to_string();
        config.usage_limit = 100;
        repo.update(&config).await.unwrap();

        let found = repo
            .get(&owner, &config.key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.prompt, "Updated prompt.");
        assert_eq!(found.usage_limit, 100);

        repo.delete(&owner, &config.key).await.unwrap();
        assert!(repo.get(&owner, &config.key).await.unwrap().is_none());

        let err = repo.delete(&owner, &config.key).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
