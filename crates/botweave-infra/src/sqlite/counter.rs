//! SQLite implementation of the generic counter store.
//!
//! Backs the advisory message-credit tracker. One row per (owner, key);
//! values are plain integers with get/set semantics.

use botweave_core::quota::CounterStore;
use botweave_types::bot::OwnerId;
use botweave_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CounterStore`.
pub struct SqliteCounterStore {
    pool: DatabasePool,
}

impl SqliteCounterStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl CounterStore for SqliteCounterStore {
    async fn get(&self, owner: &OwnerId, key: &str) -> Result<Option<i64>, RepositoryError> {
        let row = sqlx::query(
            "SELECT value FROM client_counters WHERE owner = ? AND counter_key = ?",
        )
        .bind(owner.as_str())
        .bind(key)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            r.try_get("value")
                .map_err(|e| RepositoryError::Query(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, owner: &OwnerId, key: &str, value: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO client_counters (owner, counter_key, value)
             VALUES (?, ?, ?)
             ON CONFLICT(owner, counter_key) DO UPDATE SET value = excluded.value",
        )
        .bind(owner.as_str())
        .bind(key)
        .bind(value)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
