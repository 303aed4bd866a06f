// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # llm-switch CLI
//!
//! The `llm-switch` binary loads a client configuration, selects the
//! matching LLM provider adapter and talks to it.
//!
//! ## Commands
//!
//! - `llm-switch config show|validate|generate` - Configuration management
//! - `llm-switch providers` - List supported providers
//! - `llm-switch resolve|complete|health` - Build and use the configured client

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use llm_switch::commands::{self, ClientCommand, ConfigCommand};
use llm_switch::logging::{init_logging, LogFormat};

/// llm-switch - Pick an LLM provider from configuration and use it
#[derive(Parser)]
#[command(name = "llm-switch")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "LLM_SWITCH_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List supported providers and their credential policy
    #[command(name = "providers")]
    Providers,

    #[command(flatten)]
    Client(ClientCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let _log_guard = init_logging(&cli.log_level, cli.log_format)?;
    info!(
        "llm-switch {} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Providers) => commands::providers::list().await,
        Some(Commands::Client(command)) => {
            commands::client::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}
