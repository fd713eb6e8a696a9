//! Bot administration CLI commands: assign, list, remove.

use anyhow::Result;
use chrono::Utc;
use console::style;

use botweave_core::repository::BotRepository;
use botweave_infra::config::resolve_usage_limit;
use botweave_types::bot::{BotConfig, BotKey, OwnerId};

use crate::state::AppState;

/// Create a bot under an owner's account.
///
/// ```bash
/// bweave bot assign --owner uid-42 --name "Business Assistant" \
///     --prompt "You are a small-business assistant." --limit 100
/// ```
pub async fn assign_bot(
    state: &AppState,
    owner: String,
    name: String,
    prompt: Option<String>,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let key = BotKey::from_name(&name)
        .ok_or_else(|| anyhow::anyhow!("name '{name}' contains no usable characters"))?;

    let now = Utc::now();
    let bot = BotConfig {
        owner: OwnerId::new(owner),
        key,
        name,
        prompt: prompt.unwrap_or_default(),
        usage_limit: resolve_usage_limit(&state.config, limit),
        embed_url: None,
        created_at: now,
        updated_at: now,
    };

    state
        .bot_repo
        .create(&bot)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create bot: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Created bot {} for owner {}",
        style("✓").green().bold(),
        style(bot.key.as_str()).cyan(),
        style(bot.owner.as_str()).cyan()
    );
    println!(
        "  {} daily limit {}, {} free credits",
        style("·").dim(),
        bot.usage_limit,
        botweave_core::quota::MAX_CREDITS
    );
    println!();

    Ok(())
}

/// List an owner's bots.
pub async fn list_bots(state: &AppState, owner: String, json: bool) -> Result<()> {
    let owner = OwnerId::new(owner);
    let bots = state
        .bot_repo
        .list(&owner)
        .await
        .map_err(|e| anyhow::anyhow!("failed to list bots: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bots)?);
        return Ok(());
    }

    if bots.is_empty() {
        println!();
        println!("  No bots for owner {}", style(owner.as_str()).cyan());
        println!();
        return Ok(());
    }

    println!();
    for bot in &bots {
        println!(
            "  {}  {}  limit {}/day",
            style(bot.key.as_str()).cyan().bold(),
            bot.name,
            bot.usage_limit
        );
    }
    println!();

    Ok(())
}

/// Delete an owner's bot.
pub async fn remove_bot(state: &AppState, owner: String, key: String, json: bool) -> Result<()> {
    let owner = OwnerId::new(owner);
    let key: BotKey = key
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    state
        .bot_repo
        .delete(&owner, &key)
        .await
        .map_err(|e| anyhow::anyhow!("failed to delete bot: {e}"))?;

    if let Err(err) = botweave_core::convo::ConversationRepository::clear(
        state.conversation_repo.as_ref(),
        &owner,
        &key,
    )
    .await
    {
        tracing::warn!(error = %err, bot = %key, "failed to clear transcript on delete");
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": key.to_string() }));
    } else {
        println!();
        println!(
            "  {} Deleted bot {}",
            style("✓").green().bold(),
            style(key.as_str()).cyan()
        );
        println!();
    }

    Ok(())
}
