//! Chatline terminal client entry point.
//!
//! Binary name: `chatline`
//!
//! Parses CLI arguments, sets up tracing, wires the application state, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatline_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatline", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.api_url.as_deref()).await?;

    let result = match cli.command {
        Commands::Chat { session } => {
            cli::chat::loop_runner::run_chat_loop(&state, session.as_deref(), cli.quiet).await
        }
        Commands::Sessions => cli::session::list_sessions(&state, cli.json).await,
        Commands::Whoami => cli::identity::whoami(&state, cli.json),
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
