//! SQLite conversation repository implementation.
//!
//! Transcripts are stored as one JSON blob per (owner, bot); saves overwrite
//! the whole list. The daily usage counter is bumped with a single upsert so
//! concurrent turns never lose increments.

use botweave_core::convo::ConversationRepository;
use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::chat::Message;
use botweave_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::bot::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn load(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> Result<Option<Vec<Message>>, RepositoryError> {
        let row = sqlx::query("SELECT messages FROM conversations WHERE owner = ? AND bot_key = ?")
            .bind(owner.as_str())
            .bind(bot.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let json: String = row
                    .try_get("messages")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let messages: Vec<Message> = serde_json::from_str(&json)
                    .map_err(|e| RepositoryError::Query(format!("invalid transcript JSON: {e}")))?;
                Ok(Some(messages))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO conversations (owner, bot_key, messages, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(owner, bot_key) DO UPDATE SET
                 messages = excluded.messages,
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

    async fn clear(&self, owner: &OwnerId, bot: &BotKey) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM conversations WHERE owner = ? AND bot_key = ?")
            .bind(owner.as_str())
            .bind(bot.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn load_usage(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        day: &str,
    ) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "SELECT count FROM usage_counters WHERE owner = ? AND bot_key = ? AND day = ?",
        )
        .bind(owner.as_str())
        .bind(bot.as_str())
        .bind(day)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => row
                .try_get("count")
                .map_err(|e| RepositoryError::Query(e.to_string())),
            None => Ok(0),
        }
    }

    async fn bump_usage(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        day: &str,
    ) -> Result<i64, RepositoryError> {
        // Atomic upsert; the increment happens inside SQLite so concurrent
        // bumps are never lost.
        let row = sqlx::query(
            "INSERT INTO usage_counters (owner, bot_key, day, count, last_used)
             VALUES (?, ?, ?, 1, ?)
             ON CONFLICT(owner, bot_key, day) DO UPDATE SET
                 count = count + 1,
                 last_used = excluded.last_used
             RETURNING count",
        )
        .bind(owner.as_str())
        .bind(bot.as_str())
        .bind(day)
        .bind(format_datetime(&Utc::now()))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.try_get("count")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}
