//! Conversation transcript and usage metering types.
//!
//! A conversation is one persisted record per (owner, bot) pair holding the
//! full message list. Saves are upserts that overwrite the record, matching
//! the document-store semantics the platform was built around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::bot::{BotKey, OwnerId};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// The persisted transcript for one (owner, bot) pair.
///
/// The system preamble is never stored; it is re-derived from the bot's
/// prompt at request time. At most one record exists per pair -- saves
/// overwrite the whole message list (last writer wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub owner: OwnerId,
    pub bot: BotKey,
    pub messages: Vec<Message>,
    pub updated_at: DateTime<Utc>,
}

/// Per-day successful-turn counter for one (owner, bot) pair.
///
/// Keyed by UTC ISO date; an absent record reads as zero, so the counter
/// resets implicitly at day rollover and old days age out on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageCounter {
    pub owner: OwnerId,
    pub bot: BotKey,
    pub day: String,
    pub count: i64,
    pub last_used: DateTime<Utc>,
}

/// UTC calendar day key in ISO date form (`YYYY-MM-DD`).
pub fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Today's day key.
pub fn today() -> String {
    day_key(Utc::now())
}
