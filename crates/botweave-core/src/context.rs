//! Context composer: builds the instruction payload sent with every
//! completion request.
//!
//! The system payload is assembled from up to three parts, in order:
//! a serialized persistent-memory block (when the bot has one), the bot's
//! base instruction text, and one labeled block per uploaded file. The
//! conversation history is truncated to a fixed recent window; older turns
//! stay persisted for review but never travel upstream.

use botweave_types::chat::Message;
use botweave_types::memory::BotMemory;

/// Number of recent turns included in the outbound message list. Fixed,
/// not configurable: it bounds payload size and keeps replies grounded in
/// the recent exchange.
pub const HISTORY_WINDOW: usize = 6;

/// The composed payload for one completion request.
#[derive(Debug, Clone)]
pub struct ComposedContext {
    /// Single system instruction payload (always first, never repeated).
    pub system: String,
    /// The trailing history window, oldest first.
    pub window: Vec<Message>,
}

/// Builds completion payloads from bot configuration and history.
pub struct ContextComposer;

impl ContextComposer {
    /// Compose the system payload and recent-history window.
    ///
    /// There is no validation of total payload size; if the upstream model
    /// rejects an oversized request it surfaces as a generic gateway error.
    pub fn compose(
        base_instructions: &str,
        memory: Option<&BotMemory>,
        history: &[Message],
    ) -> ComposedContext {
        let mut system = String::new();

        if let Some(memory) = memory.filter(|m| !m.is_empty()) {
            system.push_str("Persistent memory:\n");
            system.push_str(&Self::memory_block(memory));
            system.push_str("\n\n");
        }

        system.push_str(base_instructions);

        if let Some(memory) = memory {
            for file in &memory.uploaded_files {
                system.push_str(&format!(
                    "\n\nUploaded Content from {}:\n{}",
                    file.file_name, file.content
                ));
            }
        }

        let start = history.len().saturating_sub(HISTORY_WINDOW);
        let window = history[start..].to_vec();

        ComposedContext { system, window }
    }

    /// Serialize the bookkeeping reference data (chart of accounts and
    /// vendor defaults). Uploaded files are excluded here; they get their
    /// own labeled blocks so the model can attribute content to a file.
    fn memory_block(memory: &BotMemory) -> String {
        let reference = serde_json::json!({
            "chart_of_accounts": memory.chart_of_accounts,
            "vendor_defaults": memory.vendor_defaults,
        });
        serde_json::to_string_pretty(&reference).unwrap_or_else(|_| "{}".to_string())
    }
}
