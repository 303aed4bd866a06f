// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! LLM Client Acquisition
//!
//! Loads the client configuration and hands it to the factory.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements client acquisition
//! - **Integration:** ClientConfig → LLMClientFactory → `Box<dyn LLMProvider>`

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::client_config::ClientConfig;
use crate::domain::llm::LLMProvider;
use crate::infrastructure::llm::LLMClientFactory;

/// Build the configured client using the built-in token-limit table.
///
/// `config_path` overrides file discovery; environment overrides apply either way.
pub fn get_llm_client(config_path: Option<PathBuf>) -> Result<Box<dyn LLMProvider>> {
    let config = ClientConfig::load_or_default(config_path)
        .context("Failed to load LLM client configuration")?;
    get_llm_client_with(&config, &LLMClientFactory::default())
}

/// Build a client from an already-loaded configuration.
pub fn get_llm_client_with(
    config: &ClientConfig,
    factory: &LLMClientFactory,
) -> Result<Box<dyn LLMProvider>> {
    let client = factory
        .create(config)
        .with_context(|| format!("Failed to create LLM client for provider '{}'", config.provider))?;
    Ok(client)
}
