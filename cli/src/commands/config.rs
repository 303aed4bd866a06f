// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use llm_switch_core::domain::client_config::{ClientConfig, CONFIG_PATH_ENV};

const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./llm-switch.yaml)
        #[arg(short, long, default_value = "./llm-switch.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => {
            validate(file.or(config_override)).await?;
            println!("{}", "✓ Configuration is valid".green());
            Ok(())
        }
        ConfigCommand::Generate { output, examples } => {
            generate(&output, examples).await?;
            println!(
                "{}",
                format!("✓ Configuration generated: {}", output.display()).green()
            );
            Ok(())
        }
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ClientConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./llm-switch.yaml");
        println!("  4. ~/.llm-switch/config.yaml");
        println!("  5. /etc/llm-switch/config.yaml");
        if let Some(found) = ClientConfig::discover_config() {
            println!("  Discovered: {}", found.display());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Provider:".bold());
    println!("  Name: {}", config.provider);
    println!("  Model: {}", config.model);
    println!(
        "  Endpoint: {}",
        config.endpoint.as_deref().unwrap_or("(provider default)")
    );
    if let Some(version) = &config.api_version {
        println!("  API version: {}", version);
    }
    println!("  API key: {}", describe_secret(config.api_key.as_deref()));
    println!("  Max tokens: {}", config.max_tokens);
    println!("  Streaming: {}", config.streaming);
    if let Some(model) = &config.transcription_model {
        println!("  Transcription model: {}", model);
    }
    println!();

    println!("{}", "Fallback:".bold());
    match (&config.fallback_endpoint, &config.fallback_model) {
        (Some(endpoint), Some(model)) => {
            println!("  Endpoint: {}", endpoint);
            println!("  Model: {}", model);
            println!(
                "  API key: {}",
                describe_secret(config.fallback_api_key.as_deref())
            );
        }
        _ => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    Ok(())
}

/// Load and validate a configuration, returning it on success.
///
/// An explicit file is checked as written; environment overrides only apply
/// to the discovered configuration.
pub async fn validate(config_path: Option<PathBuf>) -> Result<ClientConfig> {
    println!("Validating configuration...");

    let config = match config_path {
        Some(path) => ClientConfig::from_yaml_file(&path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => ClientConfig::load_or_default(None).context("Failed to load configuration")?,
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Write a sample configuration file.
pub async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        EXAMPLES_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    Ok(())
}

/// Render a secret for display without leaking it.
///
/// `env:VAR` references are shown as-is; literal keys keep only their last
/// four characters.
pub fn describe_secret(value: Option<&str>) -> String {
    match value {
        None => "(not set)".to_string(),
        Some(v) if v.starts_with("env:") => v.to_string(),
        Some(v) => {
            let chars: Vec<char> = v.chars().collect();
            if chars.len() <= 4 {
                "****".to_string()
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("****{}", tail)
            }
        }
    }
}
