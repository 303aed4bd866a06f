// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider
//!
//! The closed set of adapter families and their credential policy.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Parses the configured provider name and decides whether an API key is mandatory

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which adapter family to build.
///
/// Adding a variant forces every `match` over it (the factory dispatch in
/// particular) to grow a branch before the crate compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Ollama,
    Anthropic,
    Custom,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAI,
        ProviderKind::Ollama,
        ProviderKind::Anthropic,
        ProviderKind::Custom,
        ProviderKind::Gemini,
    ];

    /// Configuration literal for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Custom => "custom",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Credential policy: must `api_key` be set before construction?
    pub fn requires_api_key(&self) -> bool {
        match self {
            ProviderKind::OpenAI
            | ProviderKind::Ollama
            | ProviderKind::Custom
            | ProviderKind::Gemini => true,
            ProviderKind::Anthropic => false,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ClientFactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAI),
            "ollama" => Ok(ProviderKind::Ollama),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "custom" => Ok(ProviderKind::Custom),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(ClientFactoryError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Errors raised while selecting and constructing a client.
///
/// Both are terminal for the call: nothing is retried and no adapter is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientFactoryError {
    #[error("Unsupported LLM provider: '{0}'")]
    UnsupportedProvider(String),

    #[error("LLM API key is not set for provider '{provider}'")]
    MissingCredential { provider: ProviderKind },
}
