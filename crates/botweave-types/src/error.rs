use thiserror::Error;

/// Errors related to bot configuration operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot not found")]
    NotFound,

    #[error("bot key '{0}' already exists")]
    KeyConflict(String),

    #[error("invalid bot name: {0}")]
    InvalidName(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in
/// botweave-core).
///
/// `PermissionDenied` is deliberately its own variant: a signed-in identity
/// reaching for someone else's bot is an access-denied state for the user,
/// never to be folded into gateway or generic storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("conflict: {0}")]
    Conflict(String),
}
