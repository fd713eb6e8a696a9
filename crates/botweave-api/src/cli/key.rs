//! API key administration CLI commands.

use anyhow::Result;
use console::style;

use botweave_types::bot::OwnerId;

use crate::http::extractors::auth::issue_api_key;
use crate::state::AppState;

/// Issue a new API key for an owner and print it once.
pub async fn issue_key(state: &AppState, owner: String, label: String, json: bool) -> Result<()> {
    let owner = OwnerId::new(owner);
    let key = issue_api_key(&state.db_pool, &owner, &label).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "owner": owner.as_str(), "label": label, "key": key })
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} API key for {} (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(owner.as_str()).cyan()
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();

    Ok(())
}
