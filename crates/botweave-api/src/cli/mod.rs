//! CLI command definitions and dispatch for the `bweave` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI is the admin
//! surface: issuing API keys, assigning bots to owners, and running the
//! REST API server.

pub mod bot;
pub mod key;
pub mod status;
pub mod tx;

use clap::{Parser, Subcommand};

/// Run and administer the Botweave platform.
#[derive(Parser)]
#[command(name = "bweave", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8787")]
        port: u16,

        /// Host to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Issue an API key for an owner.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Administer bots on behalf of owners.
    Bot {
        #[command(subcommand)]
        action: BotCommand,
    },

    /// List bookkeeping ledger entries.
    Tx {
        #[command(subcommand)]
        action: TxCommand,
    },

    /// Show platform status (data dir, config, counts).
    Status,
}

#[derive(Subcommand)]
pub enum TxCommand {
    /// List an owner's transactions, newest first.
    List {
        #[arg(long)]
        owner: String,

        /// Filter by kind (`income` or `expense`).
        #[arg(long)]
        kind: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Generate a key for an owner; shown once, stored hashed.
    Issue {
        /// Owner identity the key authenticates as.
        #[arg(long)]
        owner: String,

        /// Human-readable label for the key.
        #[arg(long, default_value = "default")]
        label: String,
    },
}

#[derive(Subcommand)]
pub enum BotCommand {
    /// Create a bot under an owner's account.
    Assign {
        /// Owner identity the bot belongs to.
        #[arg(long)]
        owner: String,

        /// Display name; the key is derived from it.
        #[arg(long)]
        name: String,

        /// Base instruction text.
        #[arg(long)]
        prompt: Option<String>,

        /// Daily usage limit override.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List an owner's bots.
    List {
        #[arg(long)]
        owner: String,
    },

    /// Delete an owner's bot.
    #[command(alias = "rm")]
    Remove {
        #[arg(long)]
        owner: String,

        /// Bot key to delete.
        key: String,
    },
}
