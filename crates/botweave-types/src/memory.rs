//! Per-bot persistent memory: bookkeeping reference data and uploaded files.
//!
//! The memory record is a JSON document owned by one (owner, bot) pair. It
//! feeds two places: the bookkeeping shortcut validates vendors against it,
//! and the context composer serializes it into the system payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// Chart of accounts split by account type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    #[serde(default)]
    pub revenue: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<String>,
}

/// Default categorization for a known vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDefault {
    /// Category path in `"<Type> > <Subcategory>"` form,
    /// e.g. `"Expenses > Office"`.
    pub category: String,
    #[serde(default)]
    pub auto_tag: bool,
}

/// Reference material uploaded for a bot. File names are unique within a
/// bot's set; re-uploading a name replaces the previous content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    /// Extracted text content. Extraction from PDF/DOCX happens upstream;
    /// Botweave only ever sees text.
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The full persistent-memory document for one bot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotMemory {
    #[serde(default)]
    pub chart_of_accounts: ChartOfAccounts,
    /// Vendor name -> default categorization. BTreeMap keeps the serialized
    /// form stable, which matters because it is embedded in prompts.
    #[serde(default)]
    pub vendor_defaults: BTreeMap<String, VendorDefault>,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFile>,
}

impl BotMemory {
    /// Whether the document carries anything worth injecting into a prompt.
    pub fn is_empty(&self) -> bool {
        self.chart_of_accounts.revenue.is_empty()
            && self.chart_of_accounts.expenses.is_empty()
            && self.vendor_defaults.is_empty()
            && self.uploaded_files.is_empty()
    }
}
