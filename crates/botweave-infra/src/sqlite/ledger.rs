//! SQLite ledger repository implementation.
//!
//! Append-only: there is no update or delete path for transactions.

use botweave_core::bookkeeping::TransactionRepository;
use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::error::RepositoryError;
use botweave_types::ledger::{Transaction, TransactionKind};
use sqlx::Row;
use uuid::Uuid;

use super::bot::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `TransactionRepository`.
pub struct SqliteLedgerRepository {
    pool: DatabasePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TransactionRow {
    id: String,
    kind: String,
    amount: f64,
    description: String,
    category: Option<String>,
    recorded_at: String,
}

impl TransactionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            kind: row.try_get("kind")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }

    fn into_transaction(self) -> Result<Transaction, RepositoryError> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| RepositoryError::Query(format!("invalid transaction id: {e}")))?;
        let kind: TransactionKind = self
            .kind
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Transaction {
            id,
            kind,
            amount: self.amount,
            description: self.description,
            category: self.category,
            recorded_at: parse_datetime(&self.recorded_at)?,
        })
    }
}

impl TransactionRepository for SqliteLedgerRepository {
    async fn record(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        transaction: &Transaction,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO transactions (id, owner, bot_key, kind, amount, description, category, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(transaction.id.to_string())
        .bind(owner.as_str())
        .bind(bot.as_str())
        .bind(transaction.kind.to_string())
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(&transaction.category)
        .bind(format_datetime(&transaction.recorded_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(
        &self,
        owner: &OwnerId,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(
                    "SELECT * FROM transactions WHERE owner = ? AND kind = ? ORDER BY recorded_at DESC",
                )
                .bind(owner.as_str())
                .bind(kind.to_string())
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM transactions WHERE owner = ? ORDER BY recorded_at DESC")
                    .bind(owner.as_str())
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                TransactionRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_transaction()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> (tempfile::TempDir, SqliteLedgerRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteLedgerRepository::new(pool))
    }

    fn ids() -> (OwnerId, BotKey) {
        (OwnerId::new("uid-1"), "business-bot".parse().unwrap())
    }

    #[tokio::test]
    async fn test_record_and_list() {
        let (_dir, repo) = test_repo().await;
        let (owner, bot) = ids();

        let tx = Transaction::new(
            TransactionKind::Expense,
            42.50,
            "log $42.50 expense to Acme",
            Some("Expenses > Office".to_string()),
        );
        repo.record(&owner, &bot, &tx).await.unwrap();

        let entries = repo.list(&owner, None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, tx.id);
        assert!((entries[0].amount - 42.50).abs() < f64::EPSILON);
        assert_eq!(entries[0].category.as_deref(), Some("Expenses > Office"));
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let (_dir, repo) = test_repo().await;
        let (owner, bot) = ids();

        repo.record(
            &owner,
            &bot,
            &Transaction::new(TransactionKind::Expense, 10.0, "expense", None),
        )
        .await
        .unwrap();
        repo.record(
            &owner,
            &bot,
            &Transaction::new(TransactionKind::Income, 100.0, "income", None),
        )
        .await
        .unwrap();

        let incomes = repo.list(&owner, Some(TransactionKind::Income)).await.unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].kind, TransactionKind::Income);
    }

    #[tokio::test]
    async fn test_list_scoped_to_owner() {
        let (_dir, repo) = test_repo().await;
        let (owner, bot) = ids();

        repo.record(
            &owner,
            &bot,
            &Transaction::new(TransactionKind::Expense, 10.0, "mine", None),
        )
        .await
        .unwrap();

        let other = repo.list(&OwnerId::new("uid-2"), None).await.unwrap();
        assert!(other.is_empty());
    }
}
