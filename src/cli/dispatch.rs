//! CLI command dispatch
//!
//! - serve: load config, run the HTTP server until shutdown
//! - greeting: print the greeting for an hour
//! - time: print the current time as JSON

use tracing::{error, info};

use wescu_chat_api::ApiServer;
use wescu_chat_core::{current_time, greeting_for_hour, local_hour, ServerConfig, SystemClock};

use crate::cli::{Cli, Command, Error, Result, ServeArgs, EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SUCCESS};

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run the parsed command and return an exit code
pub async fn run(cli: Cli) -> ExitCode {
    let command = cli.command();

    let config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    let outcome = match command {
        Command::Serve(args) => serve(config, args).await,
        Command::Greeting { hour } => greeting(&config, hour),
        Command::Time => time(&config),
    };

    match outcome {
        Ok(()) => EXIT_SUCCESS,
        Err(Error::Config(e)) => {
            eprintln!("Error: {}", e);
            EXIT_CONFIG_ERROR
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Apply listener overrides on top of the loaded configuration
pub fn apply_serve_args(mut config: ServerConfig, args: ServeArgs) -> ServerConfig {
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config
}

async fn serve(config: ServerConfig, args: ServeArgs) -> Result<()> {
    let config = apply_serve_args(config, args);
    info!("Starting WESCU chat API with {:?}", config);

    let server = ApiServer::new(config)?;
    server.start().await?;
    Ok(())
}

fn greeting(config: &ServerConfig, hour: Option<u32>) -> Result<()> {
    let hour = match hour {
        Some(hour) => hour,
        None => local_hour(&SystemClock, config.tz()?),
    };

    println!("{}", greeting_for_hour(hour));
    Ok(())
}

fn time(config: &ServerConfig) -> Result<()> {
    let now = current_time(&SystemClock, config.tz()?);
    println!("{}", serde_json::to_string_pretty(&now)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args_override_config() {
        let config = ServerConfig::default();
        let config = apply_serve_args(
            config,
            ServeArgs {
                host: Some("127.0.0.1".to_string()),
                port: Some(8081),
            },
        );
        assert_eq!(config.bind_address(), "127.0.0.1:8081");
    }

    #[test]
    fn test_empty_serve_args_keep_config() {
        let config = apply_serve_args(ServerConfig::default(), ServeArgs::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
