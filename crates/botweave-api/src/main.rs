//! Botweave CLI and REST API entry point.
//!
//! Binary name: `bweave`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{BotCommand, Cli, Commands, KeyCommand, TxCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,botweave=debug",
        _ => "trace",
    };
    botweave_observe::tracing_setup::init(filter);

    // Initialize application state (config, DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Botweave API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Key { action } => match action {
            KeyCommand::Issue { owner, label } => {
                cli::key::issue_key(&state, owner, label, cli.json).await?;
            }
        },

        Commands::Bot { action } => match action {
            BotCommand::Assign {
                owner,
                name,
                prompt,
                limit,
            } => {
                cli::bot::assign_bot(&state, owner, name, prompt, limit, cli.json).await?;
            }
            BotCommand::List { owner } => {
                cli::bot::list_bots(&state, owner, cli.json).await?;
            }
            BotCommand::Remove { owner, key } => {
                cli::bot::remove_bot(&state, owner, key, cli.json).await?;
            }
        },

        Commands::Tx { action } => match action {
            TxCommand::List { owner, kind } => {
                cli::tx::list_transactions(&state, owner, kind, cli.json).await?;
            }
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
