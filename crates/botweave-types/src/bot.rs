use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Opaque identity of a bot owner, as issued by the external identity
/// provider. Botweave never inspects it beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe key identifying a bot within its owner's namespace
/// ("Business Assistant" -> "business-assistant").
///
/// Doubles as the suffix of the advisory credit counter key
/// (`credits-<key>`), so it must stay stable across renames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotKey(String);

impl BotKey {
    /// Derive a key from a display name via [`slugify`].
    ///
    /// Returns `None` when the name contains no usable characters.
    pub fn from_name(name: &str) -> Option<Self> {
        let slug = slugify(name);
        if slug.is_empty() { None } else { Some(Self(slug)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        if slug.is_empty() {
            Err(format!("invalid bot key: '{s}'"))
        } else {
            Ok(Self(slug))
        }
    }
}

/// Per-owner bot configuration.
///
/// The `prompt` is the bot's base instruction text; uploading reference
/// files appends labeled blocks to it. `usage_limit` caps successful model
/// turns per UTC day (metered server-side, distinct from the advisory
/// credit counter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub owner: OwnerId,
    pub key: BotKey,
    /// Freeform display name.
    pub name: String,
    /// Base instruction text sent as the system payload.
    pub prompt: String,
    /// Maximum successful model turns per UTC day.
    pub usage_limit: u32,
    /// Optional external embed reference for the hosted widget.
    pub embed_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create (or admin-assign) a bot. Only `name` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    pub prompt: Option<String>,
    pub usage_limit: Option<u32>,
    pub embed_url: Option<String>,
}

/// Default daily usage limit when none is configured.
pub const DEFAULT_USAGE_LIMIT: u32 = 50;

/// Generate a URL-safe slug from a display name.
///
/// Rules:
/// - Lowercase
/// - Replace non-alphanumeric characters with hyphens
/// - Collapse consecutive hyphens into one
/// - Trim leading/trailing hyphens
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    // Collapse consecutive hyphens and trim edges
    let mut result = String::with_capacity(slug.len());
    let mut prev_was_hyphen = true; // treat start as hyphen to trim leading
    for c in slug.chars() {
        if c == '-' {
            if !prev_was_hyphen {
                result.push('-');
            }
            prev_was_hyphen = true;
        } else {
            result.push(c);
            prev_was_hyphen = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Business Assistant"), "business-assistant");
    }

    #[test]
    fn test_slugify_special_chars() {
        assert_eq!(slugify("My  FAQ  Bot!"), "my-faq-bot");
    }

    #[test]
    fn test_slugify_leading_trailing() {
        assert_eq!(slugify("---hello---world---"), "hello-world");
    }

    #[test]
    fn test_bot_key_from_name() {
        let key = BotKey::from_name("Business Assistant").unwrap();
        assert_eq!(key.as_str(), "business-assistant");
    }

    #[test]
    fn test_bot_key_rejects_empty() {
        assert!(BotKey::from_name("!!!").is_none());
        assert!("???".parse::<BotKey>().is_err());
    }

    #[test]
    fn test_bot_key_parse_normalizes() {
        let key: BotKey = "Faq Bot".parse().unwrap();
        assert_eq!(key.as_str(), "faq-bot");
    }

    #[test]
    fn test_owner_id_display() {
        let owner = OwnerId::new("uid-123");
        assert_eq!(owner.to_string(), "uid-123");
    }
}
