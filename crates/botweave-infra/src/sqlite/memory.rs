//! SQLite memory repository implementation.
//!
//! The memory document is one JSON blob per (owner, bot). Merge logic lives
//! in core; this layer only reads and overwrites whole documents.

use botweave_core::memory::MemoryRepository;
use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::error::RepositoryError;
use botweave_types::memory::BotMemory;
use chrono::Utc;
use sqlx::Row;

use super::bot::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `MemoryRepository`.
pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl MemoryRepository for SqliteMemoryRepository {
    async fn load(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> Result<Option<BotMemory>, RepositoryError> {
        let row = sqlx::query("SELECT document FROM bot_memory WHERE owner = ? AND bot_key = ?")
            .bind(owner.as_str())
            .bind(bot.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let json: String = row
                    .try_get("document")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let memory: BotMemory = serde_json::from_str(&json)
                    .map_err(|e| RepositoryError::Query(format!("invalid memory JSON: {e}")))?;
                Ok(Some(memory))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        memory: &BotMemory,
    ) -> Result<(), RepositoryError> {
        let json =
            serde_json::to_string(memory).map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO bot_memory (owner, bot_key, document, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(owner, bot_key) DO UPDATE SET
                 document = excluded.document,
                 updated_at = excluded.updated_at",
        )
        .bind(owner.as_str())
        .bind(bot.as_str())
        .bind(&json)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botweave_core::memory::merge_uploaded_file;
    use botweave_types::memory::{UploadedFile, VendorDefault};

    async fn test_repo() -> (tempfile::TempDir, SqliteMemoryRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteMemoryRepository::new(pool))
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let (_dir, repo) = test_repo().await;
        let memory = repo
            .load(&OwnerId::new("uid-1"), &"bot".parse().unwrap())
            .await
            .unwrap();
        assert!(memory.is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload_roundtrips_document() {
        let (_dir, repo) = test_repo().await;
        let owner = OwnerId::new("uid-1");
        let bot: BotKey = "business-bot".parse().unwrap();

        let mut memory = BotMemory::default();
        memory.chart_of_accounts.expenses = vec!["Office".to_string()];
        memory.vendor_defaults.insert(
            "Acme".to_string(),
            VendorDefault {
                category: "Expenses > Office".to_string(),
                auto_tag: true,
            },
        );
        merge_uploaded_file(
            &mut memory,
            UploadedFile {
                file_name: "handbook.txt".to_string(),
                content: "hours 9-5".to_string(),
                uploaded_at: Utc::now(),
            },
        );

        repo.save(&owner, &bot, &memory).await.unwrap();

        let loaded = repo.load(&owner, &bot).await.unwrap().unwrap();
        assert_eq!(loaded.chart_of_accounts.expenses, ["Office"]);
        assert_eq!(loaded.uploaded_files.len(), 1);
        assert!(loaded.vendor_defaults.contains_key("Acme"));
    }

    #[tokio::test]
    async fn test_save_overwrites_document() {
        let (_dir, repo) = test_repo().await;
        let owner = OwnerId::new("uid-1");
        let bot: BotKey = "business-bot".parse().unwrap();

        let mut memory = BotMemory::default();
        memory.chart_of_accounts.revenue = vec!["Consulting".to_string()];
        repo.save(&owner, &bot, &memory).await.unwrap();

        memory.chart_of_accounts.revenue = vec!["Sales".to_string()];
        repo.save(&owner, &bot, &memory).await.unwrap();

        let loaded = repo.load(&owner, &bot).await.unwrap().unwrap();
        assert_eq!(loaded.chart_of_accounts.revenue, ["Sales"]);
    }
}
