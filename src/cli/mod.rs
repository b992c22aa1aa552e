//! CLI module
//!
//! Provides:
//! - Argument parsing (serve, greeting, time)
//! - Logging setup
//! - Command dispatch

pub mod args;
pub mod dispatch;
pub mod logging;

// Re-exports
pub use args::{Cli, Command, ServeArgs};
pub use dispatch::{run, ExitCode};
pub use logging::init_logging;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] wescu_chat_core::ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
