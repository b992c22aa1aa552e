//! WESCU chat backend entry point
//!
//! With no subcommand the HTTP server starts.

use clap::Parser;

use wescu_chat::cli::{init_logging, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let code = run(cli).await;
    std::process::exit(code);
}
