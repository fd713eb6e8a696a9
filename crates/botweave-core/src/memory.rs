//! Persistent bot memory: repository trait and merge rules.
//!
//! Memory updates are merge-upserts. Uploading a file with a name that
//! already exists replaces that file in place; everything else in the
//! memory document is untouched.

use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::error::RepositoryError;
use botweave_types::memory::{BotMemory, UploadedFile};

/// Repository trait for per-bot persistent memory.
///
/// Implementations live in botweave-infra. `load` returns `None` for a bot
/// that has never had memory written.
pub trait MemoryRepository: Send + Sync {
    fn load(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
    ) -> impl std::future::Future<Output = Result<Option<BotMemory>, RepositoryError>> + Send;

    /// Write the full memory document (merge happens in core before the
    /// write, so the stored document is always the merged result).
    fn save(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        memory: &BotMemory,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Merge an uploaded file into memory, replacing any existing file with the
/// same name. Order is preserved on replace; new files append.
pub fn merge_uploaded_file(memory: &mut BotMemory, file: UploadedFile) {
    match memory
        .uploaded_files
        .iter_mut()
        .find(|existing| existing.file_name == file.file_name)
    {
        Some(existing) => *existing = file,
        None => memory.uploaded_files.push(file),
    }
}

/// Remove an uploaded file by name. Returns whether anything was removed.
pub fn remove_uploaded_file(memory: &mut BotMemory, file_name: &str) -> bool {
    let before = memory.uploaded_files.len();
    memory.uploaded_files.retain(|f| f.file_name != file_name);
    memory.uploaded_files.len() != before
}
