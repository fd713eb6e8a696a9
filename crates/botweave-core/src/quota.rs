//! Advisory per-bot message credits.
//!
//! Every bot starts with a fixed allowance of free message turns. The
//! counter lives in an injected [`CounterStore`] so the default
//! client-grade implementation can be swapped for a server-authoritative
//! one (atomic increment keyed by owner+bot+day) without touching the
//! controller.
//!
//! LIMITATION: with the default store this is UX-level metering, not a
//! security boundary. Nothing stops a user from resetting their own
//! counter; billing-grade enforcement belongs in the daily usage counter
//! on the conversation repository.

use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::error::RepositoryError;

/// Free message turns granted per bot before the upsell kicks in.
pub const MAX_CREDITS: i64 = 10;

/// Minimal get/set counter storage.
///
/// Implementations live in botweave-infra (e.g., `SqliteCounterStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait CounterStore: Send + Sync {
    /// Read a counter. `None` means no value has ever been written.
    fn get(
        &self,
        owner: &OwnerId,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<i64>, RepositoryError>> + Send;

    /// Write a counter, creating it if absent.
    fn set(
        &self,
        owner: &OwnerId,
        key: &str,
        value: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Tracks remaining free message credits per (owner, bot).
pub struct QuotaTracker<S: CounterStore> {
    store: S,
}

impl<S: CounterStore> QuotaTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Storage key for a bot's credit counter.
    fn credits_key(bot: &BotKey) -> String {
        format!("credits-{bot}")
    }

    /// Remaining credits for a bot. Absent counter reads as [`MAX_CREDITS`].
    pub async fn remaining(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> Result<i64, RepositoryError> {
        let stored = self.store.get(owner, &Self::credits_key(bot)).await?;
        Ok(stored.unwrap_or(MAX_CREDITS))
    }

    /// Burn one credit and return the new remaining count.
    ///
    /// Decrements unconditionally -- callers MUST gate on
    /// `remaining(..) <= 0` first; there is no clamping at zero.
    pub async fn consume_one(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> Result<i64, RepositoryError> {
        let remaining = self.remaining(owner, bot).await? - 1;
        self.store
            .set(owner, &Self::credits_key(bot), remaining)
            .await?;
        Ok(remaining)
    }
}
