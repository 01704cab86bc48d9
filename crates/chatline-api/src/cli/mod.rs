//! CLI command definitions and dispatch for the `chatline` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod identity;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with a conversational API from the terminal.
#[derive(Parser)]
#[command(name = "chatline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip the banner and spinner; only replies and errors are printed.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Chat API base URL, overriding config.toml.
    #[arg(long, global = true, env = "CHATLINE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat {
        /// Continue a past session by ID.
        #[arg(long)]
        session: Option<String>,
    },

    /// List past conversation sessions.
    Sessions,

    /// Show this device's user id.
    Whoami,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
