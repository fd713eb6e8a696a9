//! Storage trait for conversation transcripts and the daily usage counter.

use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::chat::Message;
use botweave_types::error::RepositoryError;

/// Persistence boundary for transcripts and per-day usage metering.
///
/// One record per (owner, bot); `save` overwrites the whole message list
/// (last writer wins). The usage counter is keyed by UTC day and must be
/// bumped atomically by implementations.
pub trait ConversationRepository: Send + Sync {
    /// Load the full transcript. `None` for a pair that has never chatted.
    fn load(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Message>>, RepositoryError>> + Send;

    /// Overwrite the transcript with the given message list.
    fn save(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the transcript. Usage counters are left untouched.
    fn clear(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Successful-turn count for one UTC day. Absent reads as zero.
    fn load_usage(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        day: &str,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Atomically increment the day's counter and return the new count.
    fn bump_usage(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        day: &str,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
