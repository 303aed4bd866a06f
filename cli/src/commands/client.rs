// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Client commands
//!
//! Commands: resolve, complete, health

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use llm_switch_core::domain::client_config::ClientConfig;
use llm_switch_core::domain::provider::ProviderKind;
use llm_switch_core::domain::{GenerationOptions, ResolvedLimits};
use llm_switch_core::infrastructure::StaticTokenLimits;
use llm_switch_core::get_llm_client;

#[derive(Subcommand)]
pub enum ClientCommand {
    /// Show the provider and effective max tokens for the loaded config
    Resolve,

    /// Send a prompt to the configured provider
    Complete {
        /// Prompt text
        prompt: String,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Requested max tokens (capped at the resolved limit)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// System prompt
        #[arg(long)]
        system: Option<String>,
    },

    /// Check that the configured provider is reachable
    Health,
}

pub async fn handle_command(command: ClientCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        ClientCommand::Resolve => resolve(config_path).await,
        ClientCommand::Complete {
            prompt,
            temperature,
            max_tokens,
            system,
        } => {
            let mut options = GenerationOptions {
                max_tokens,
                system_prompt: system,
                ..GenerationOptions::default()
            };
            if temperature.is_some() {
                options.temperature = temperature;
            }
            complete(config_path, &prompt, &options).await
        }
        ClientCommand::Health => health(config_path).await,
    }
}

/// Effective provider and limit for a configuration, without building a client.
pub fn describe_resolution(config: &ClientConfig) -> Result<(ProviderKind, ResolvedLimits)> {
    let kind: ProviderKind = config.provider.parse()?;
    let limits = ResolvedLimits::resolve(&StaticTokenLimits::default(), config);
    Ok((kind, limits))
}

async fn resolve(config_path: Option<PathBuf>) -> Result<()> {
    let config = ClientConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;
    let (kind, limits) = describe_resolution(&config)?;

    println!("{}", "Resolved client:".bold());
    println!("  Provider: {}", kind);
    println!("  Model: {}", config.model);
    println!("  Max tokens: {}", limits.effective_max_tokens);
    if limits.effective_max_tokens != config.max_tokens {
        println!(
            "  {}",
            format!("(model limit overrides configured {})", config.max_tokens).dimmed()
        );
    }

    Ok(())
}

async fn complete(
    config_path: Option<PathBuf>,
    prompt: &str,
    options: &GenerationOptions,
) -> Result<()> {
    let client = get_llm_client(config_path)?;
    let response = client
        .generate(prompt, options)
        .await
        .with_context(|| format!("{} request failed", client.kind()))?;

    println!("{}", response.text);
    eprintln!(
        "{}",
        format!(
            "[{} / {}] {} prompt + {} completion tokens, finish: {:?}",
            response.provider,
            response.model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.finish_reason
        )
        .dimmed()
    );

    Ok(())
}

async fn health(config_path: Option<PathBuf>) -> Result<()> {
    let client = get_llm_client(config_path)?;

    match client.health_check().await {
        Ok(()) => {
            println!(
                "{}",
                format!("✓ {} ({}) is healthy", client.kind(), client.model()).green()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "{}",
                format!("✗ {} ({}) is unhealthy: {}", client.kind(), client.model(), e).red()
            );
            Err(e.into())
        }
    }
}
