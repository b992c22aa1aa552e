//! CLI argument parsing tests

use clap::Parser;
use std::path::PathBuf;

use wescu_chat::cli::{Cli, Command, ServeArgs};

#[test]
fn test_no_subcommand_defaults_to_serve() {
    let cli = Cli::try_parse_from(["wescu-chat"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.command(), Command::Serve(ServeArgs::default()));
    assert!(!cli.log_json);
}

#[test]
fn test_serve_overrides() {
    let cli = Cli::try_parse_from([
        "wescu-chat",
        "serve",
        "--host",
        "127.0.0.1",
        "--port",
        "8080",
        "--log-json",
        "--config",
        "/etc/wescu/chat.toml",
    ])
    .unwrap();

    assert_eq!(
        cli.command(),
        Command::Serve(ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(8080),
        })
    );
    assert!(cli.log_json);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/wescu/chat.toml")));
}

#[test]
fn test_greeting_hour() {
    let cli = Cli::try_parse_from(["wescu-chat", "greeting", "--hour", "18"]).unwrap();
    assert_eq!(cli.command(), Command::Greeting { hour: Some(18) });
}

#[test]
fn test_greeting_hour_out_of_range_is_rejected() {
    assert!(Cli::try_parse_from(["wescu-chat", "greeting", "--hour", "24"]).is_err());
}

#[test]
fn test_time_command() {
    let cli = Cli::try_parse_from(["wescu-chat", "time"]).unwrap();
    assert_eq!(cli.command(), Command::Time);
}

#[test]
fn test_invalid_port_is_rejected() {
    assert!(Cli::try_parse_from(["wescu-chat", "serve", "--port", "70000"]).is_err());
}
