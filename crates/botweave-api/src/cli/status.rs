//! Platform status CLI command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Show data directory, config, and row counts.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let bot_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bots")
        .fetch_one(&state.db_pool.reader)
        .await?;
    let conversation_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
        .fetch_one(&state.db_pool.reader)
        .await?;
    let transaction_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(&state.db_pool.reader)
        .await?;
    let key_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM api_keys")
        .fetch_one(&state.db_pool.reader)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": state.data_dir.display().to_string(),
                "model": state.config.model,
                "booking_enabled": state.form_client.is_some(),
                "bots": bot_count.0,
                "conversations": conversation_count.0,
                "transactions": transaction_count.0,
                "api_keys": key_count.0,
            })
        );
        return Ok(());
    }

    println!();
    println!("  {} Botweave status", style("⚙").bold());
    println!();
    println!("  data dir       {}", style(state.data_dir.display()).dim());
    println!("  model          {}", state.config.model);
    println!(
        "  booking        {}",
        if state.form_client.is_some() {
            format!("{}", style("enabled").green())
        } else {
            format!("{}", style("disabled").dim())
        }
    );
    println!("  bots           {}", bot_count.0);
    println!("  conversations  {}", conversation_count.0);
    println!("  transactions   {}", transaction_count.0);
    println!("  api keys       {}", key_count.0);
    println!();

    Ok(())
}
