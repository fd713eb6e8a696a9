//! Bot configuration repository trait.

use botweave_types::bot::{BotConfig, BotKey, OwnerId};
use botweave_types::error::RepositoryError;

/// Storage boundary for bot configurations.
///
/// Keys are globally unique (they double as widget identifiers), so lookup
/// is by key alone; implementations must return
/// [`RepositoryError::PermissionDenied`] when the caller's owner does not
/// match the stored one.
pub trait BotRepository: Send + Sync {
    /// Insert a new bot. Fails with `Conflict` when the key is taken.
    fn create(
        &self,
        bot: &BotConfig,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch a bot by key, checking ownership.
    fn get(
        &self,
        owner: &OwnerId,
        key: &BotKey,
    ) -> impl std::future::Future<Output = Result<Option<BotConfig>, RepositoryError>> + Send;

    /// All bots belonging to an owner, oldest first.
    fn list(
        &self,
        owner: &OwnerId,
    ) -> impl std::future::Future<Output = Result<Vec<BotConfig>, RepositoryError>> + Send;

    /// Update mutable fields (name, prompt, usage limit, embed URL).
    fn update(
        &self,
        bot: &BotConfig,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a bot, checking ownership. Related records (transcript,
    /// memory, counters) are removed by the caller.
    fn delete(
        &self,
        owner: &OwnerId,
        key: &BotKey,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
