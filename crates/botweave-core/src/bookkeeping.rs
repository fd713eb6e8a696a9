//! Vendor validation and ledger recording for the bookkeeping shortcut.
//!
//! Validation is pure: it checks a vendor against the bot's persistent
//! memory (vendor defaults plus chart of accounts) and reports the resolved
//! category or a list of issues. Recording goes through the
//! [`TransactionRepository`] trait implemented in botweave-infra.

use botweave_types::bot::{BotKey, OwnerId};
use botweave_types::error::RepositoryError;
use botweave_types::ledger::{Transaction, TransactionKind};
use botweave_types::memory::BotMemory;

/// Outcome of validating a vendor against bot memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// Category path resolved from vendor defaults, when the vendor is known.
    pub category: Option<String>,
    pub errors: Vec<String>,
    pub auto_tagged: bool,
}

/// Validate a vendor against the bot's memory.
///
/// Checks, in order: the vendor has a default categorization; the category's
/// account type exists in the chart of accounts; the subcategory is listed
/// under that type. Each failure appends a human-readable issue.
pub fn validate_transaction(vendor: &str, memory: &BotMemory) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(default) = memory.vendor_defaults.get(vendor) else {
        result
            .errors
            .push(format!("No memory found for vendor \"{vendor}\""));
        return result;
    };

    result.category = Some(default.category.clone());
    result.auto_tagged = default.auto_tag;

    let mut parts = default.category.splitn(2, " > ").map(str::trim);
    let account_type = parts.next().unwrap_or("");
    let subcategory = parts.next().unwrap_or("");

    let account_list = match account_type {
        "Revenue" => &memory.chart_of_accounts.revenue,
        "Expenses" => &memory.chart_of_accounts.expenses,
        other => {
            result
                .errors
                .push(format!("Unknown account type \"{other}\""));
            return result;
        }
    };

    if !account_list.iter().any(|s| s == subcategory) {
        result.errors.push(format!(
            "Subcategory \"{subcategory}\" not found in \"{account_type}\" accounts"
        ));
    }

    result
}

/// Render the synthetic assistant message appended after a bookkeeping
/// command.
pub fn validation_message(result: &ValidationResult) -> String {
    if result.errors.is_empty() {
        format!(
            "✅ Auto-tagged to category \"{}\"",
            result.category.as_deref().unwrap_or("")
        )
    } else {
        format!("⚠️ Issues:\n- {}", result.errors.join("\n- "))
    }
}

/// Repository trait for the append-only bookkeeping ledger.
///
/// Implementations live in botweave-infra (e.g., `SqliteLedgerRepository`).
pub trait TransactionRepository: Send + Sync {
    /// Append a ledger entry for an owner's bot.
    fn record(
        &self,
        owner: &OwnerId,
        bot: &BotKey,
        transaction: &Transaction,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List entries for an owner, optionally filtered by kind, newest first.
    fn list(
        &self,
        owner: &OwnerId,
        kind: Option<TransactionKind>,
    ) -> impl std::future::Future<Output = Result<Vec<Transaction>, RepositoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use botweave_types::memory::VendorDefault;

    fn memory_with_acme() -> BotMemory {
        let mut memory = BotMemory::default();
        memory.chart_of_accounts.expenses = vec!["Office".to_string(), "Travel".to_string()];
        memory.chart_of_accounts.revenue = vec!["Consulting".to_string()];
        memory.vendor_defaults.insert(
            "Acme".to_string(),
            VendorDefault {
                category: "Expenses > Office".to_string(),
                auto_tag: true,
            },
        );
        memory
    }

    #[test]
    fn test_known_vendor_resolves_category() {
        let result = validate_transaction("Acme", &memory_with_acme());
        assert!(result.errors.is_empty());
        assert_eq!(result.category.as_deref(), Some("Expenses > Office"));
        assert!(result.auto_tagged);
    }

    #[test]
    fn test_unknown_vendor_reports_issue() {
        let result = validate_transaction("Globex", &memory_with_acme());
        assert!(result.category.is_none());
        assert_eq!(result.errors, ["No memory found for vendor \"Globex\""]);
    }

    #[test]
    fn test_unknown_account_type() {
        let mut memory = memory_with_acme();
        memory.vendor_defaults.insert(
            "Weird".to_string(),
            VendorDefault {
                category: "Liabilities > Loans".to_string(),
                auto_tag: false,
            },
        );
        let result = validate_transaction("Weird", &memory);
        assert_eq!(result.errors, ["Unknown account type \"Liabilities\""]);
        // Category is still reported even when the type is unknown.
        assert_eq!(result.category.as_deref(), Some("Liabilities > Loans"));
    }

    #[test]
    fn test_missing_subcategory() {
        let mut memory = memory_with_acme();
        memory.vendor_defaults.insert(
            "Initech".to_string(),
            VendorDefault {
                category: "Expenses > Software".to_string(),
                auto_tag: false,
            },
        );
        let result = validate_transaction("Initech", &memory);
        assert_eq!(
            result.errors,
            ["Subcategory \"Software\" not found in \"Expenses\" accounts"]
        );
    }

    #[test]
    fn test_validation_message_success_contains_subcategory() {
        let result = validate_transaction("Acme", &memory_with_acme());
        let msg = validation_message(&result);
        assert!(msg.contains("Office"));
        assert!(msg.starts_with('✅'));
    }

    #[test]
    fn test_validation_message_lists_issues() {
        let result = validate_transaction("Globex", &memory_with_acme());
        let msg = validation_message(&result);
        assert!(msg.contains("Issues:"));
        assert!(msg.contains("Globex"));
    }
}
