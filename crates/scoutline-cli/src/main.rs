//! Scoutline CLI entry point.
//!
//! Binary name: `scout`
//!
//! Parses CLI arguments, initializes the database, then dispatches to the
//! appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,scoutline=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "scout", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (data dir, database, migrations)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Embed {
            only_missing,
            batch_size,
            batch_delay,
            dry_run,
        } => {
            cli::embed::embed(
                &state,
                only_missing,
                batch_size,
                batch_delay,
                dry_run,
                cli.json,
                cli.quiet,
            )
            .await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
