// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provider-agnostic completion interface.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-corruption boundary between callers and vendor APIs

// Every adapter in infrastructure/llm/ implements `LLMProvider`. Callers only
// ever hold a `Box<dyn LLMProvider>` and never inspect the concrete type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;

/// Domain interface for LLM providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError>;

    /// Check if provider is healthy and accessible
    async fn health_check(&self) -> Result<(), LLMError>;

    /// Adapter family this client was built for
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;

    /// Effective token limit resolved at construction time
    fn max_tokens(&self) -> u32;
}

/// Options for LLM generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum tokens to generate. `None` uses the adapter's resolved limit.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: Option<f32>,

    /// Sequences that stop generation
    pub stop_sequences: Option<Vec<String>>,

    /// Optional system instruction sent ahead of the prompt
    pub system_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: Some(0.7),
            stop_sequences: None,
            system_prompt: None,
        }
    }
}

impl GenerationOptions {
    /// Completion tokens for a single request, never above the adapter's limit.
    pub fn capped_max_tokens(&self, limit: u32) -> u32 {
        match self.max_tokens {
            Some(requested) if requested > 0 => requested.min(limit),
            _ => limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Generated text
    pub text: String,

    /// Token usage stats
    pub usage: TokenUsage,

    /// Provider label (e.g., "openai", "Ollama", "Custom")
    pub provider: String,

    /// Model used (e.g., "gpt-4o", "llama3.2")
    pub model: String,

    /// Why generation stopped
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Reason why generation stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural completion (model decided to stop)
    Stop,

    /// Hit max_tokens limit
    Length,

    /// Blocked by content filter
    ContentFilter,
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LLMError {
    /// Whether a secondary endpoint could plausibly succeed where the primary failed.
    pub fn allows_fallback(&self) -> bool {
        !matches!(self, LLMError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_max_tokens() {
        let mut options = GenerationOptions::default();
        assert_eq!(options.capped_max_tokens(4096), 4096);

        options.max_tokens = Some(512);
        assert_eq!(options.capped_max_tokens(4096), 512);

        options.max_tokens = Some(10_000);
        assert_eq!(options.capped_max_tokens(4096), 4096);

        options.max_tokens = Some(0);
        assert_eq!(options.capped_max_tokens(4096), 4096);
    }

    #[test]
    fn test_fallback_eligibility() {
        assert!(LLMError::RateLimit.allows_fallback());
        assert!(LLMError::Network("timeout".into()).allows_fallback());
        assert!(!LLMError::InvalidInput("empty prompt".into()).allows_fallback());
    }

    #[test]
    fn test_token_usage_total_saturates() {
        assert_eq!(TokenUsage::new(5, 2).total_tokens, 7);
        assert_eq!(TokenUsage::new(u32::MAX, 1).total_tokens, u32::MAX);
    }
}
