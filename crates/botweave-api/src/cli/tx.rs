//! Bookkeeping ledger CLI commands.

use anyhow::Result;
use console::style;

use botweave_core::bookkeeping::TransactionRepository;
use botweave_types::bot::OwnerId;
use botweave_types::ledger::TransactionKind;

use crate::state::AppState;

/// List an owner's ledger entries, newest first.
pub async fn list_transactions(
    state: &AppState,
    owner: String,
    kind: Option<String>,
    json: bool,
) -> Result<()> {
    let owner = OwnerId::new(owner);
    let kind = kind
        .map(|s| s.parse::<TransactionKind>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let entries = state
        .ledger_repo
        .list(&owner, kind)
        .await
        .map_err(|e| anyhow::anyhow!("failed to list transactions: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  No transactions for owner {}", style(owner.as_str()).cyan());
        println!();
        return Ok(());
    }

    println!();
    for tx in &entries {
        let kind_label = match tx.kind {
            TransactionKind::Income => style("income ").green(),
            TransactionKind::Expense => style("expense").red(),
        };
        println!(
            "  {}  {}  ${:<10.2} {}  {}",
            style(tx.recorded_at.format("%Y-%m-%d %H:%M")).dim(),
            kind_label,
            tx.amount,
            tx.category.as_deref().unwrap_or("(uncategorized)"),
            style(&tx.description).dim()
        );
    }
    println!();

    Ok(())
}
