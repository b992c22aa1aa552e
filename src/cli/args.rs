//! CLI argument parsing
//!
//! ```text
//! wescu-chat [serve] [--host <host>] [--port <port>] [--config <file>] [--log-json]
//! wescu-chat greeting [--hour <0-23>]
//! wescu-chat time
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parsed CLI arguments
#[derive(Debug, Parser)]
#[command(name = "wescu-chat", version, about = "WESCU website chat assistant backend")]
pub struct Cli {
    /// Subcommand; defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// CLI commands
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Print the greeting for the current (or given) hour
    Greeting {
        /// Local hour to greet for, 0-23
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },

    /// Print the current time in the configured timezone as JSON
    Time,
}

/// Listener overrides for `serve`
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct ServeArgs {
    /// Bind host (overrides config and WESCU_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config and WESCU_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// The command to run, `serve` when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}
