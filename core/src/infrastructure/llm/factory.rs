// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Client Factory - Provider Selection and Adapter Construction
//
// Parses the configured provider, enforces its credential policy, resolves the
// effective token limit and builds exactly one adapter. Construction does no
// network I/O and every call returns a fresh adapter.

use std::sync::Arc;
use tracing::{debug, info};

use super::anthropic::AnthropicAdapter;
use super::gemini::GeminiAdapter;
use super::generic::GenericAPIAdapter;
use super::http::FallbackTarget;
use super::openai::OpenAIAdapter;
use crate::domain::client_config::ClientConfig;
use crate::domain::llm::LLMProvider;
use crate::domain::provider::{ClientFactoryError, ProviderKind};
use crate::domain::token_limits::{ResolvedLimits, TokenLimitLookup};
use crate::infrastructure::token_limits::StaticTokenLimits;

/// Builds LLM clients from configuration
#[derive(Clone)]
pub struct LLMClientFactory {
    token_limits: Arc<dyn TokenLimitLookup>,
}

impl LLMClientFactory {
    pub fn new(token_limits: Arc<dyn TokenLimitLookup>) -> Self {
        Self { token_limits }
    }

    /// Validate `config` and construct the adapter it describes.
    pub fn create(&self, config: &ClientConfig) -> Result<Box<dyn LLMProvider>, ClientFactoryError> {
        let kind: ProviderKind = config.provider.parse()?;

        let api_key = config.resolved_api_key();
        if kind.requires_api_key() && api_key.is_none() {
            return Err(ClientFactoryError::MissingCredential { provider: kind });
        }

        let limits = ResolvedLimits::resolve(self.token_limits.as_ref(), config);
        if limits.effective_max_tokens != config.max_tokens {
            debug!(
                "Model '{}' has a known limit of {} tokens (configured: {})",
                config.model, limits.effective_max_tokens, config.max_tokens
            );
        }

        info!(
            provider = %kind,
            model = %config.model,
            max_tokens = limits.effective_max_tokens,
            "Creating LLM client"
        );

        let client = build_adapter(kind, config, api_key, limits);
        metrics::counter!("llm_client_constructions_total", "provider" => kind.as_str())
            .increment(1);

        Ok(client)
    }
}

impl Default for LLMClientFactory {
    fn default() -> Self {
        Self::new(Arc::new(StaticTokenLimits::new()))
    }
}

/// One branch per provider.
fn build_adapter(
    kind: ProviderKind,
    config: &ClientConfig,
    api_key: Option<String>,
    limits: ResolvedLimits,
) -> Box<dyn LLMProvider> {
    let max_tokens = limits.effective_max_tokens;
    // Required keys were checked by the caller
    let api_key = api_key.unwrap_or_default();

    match kind {
        ProviderKind::OpenAI => Box::new(OpenAIAdapter::new(
            api_key,
            config.endpoint.clone(),
            config.api_version.clone(),
            config.model.clone(),
            config.transcription_model.clone(),
            max_tokens,
            config.streaming,
            fallback_target(config),
        )),
        ProviderKind::Ollama => Box::new(GenericAPIAdapter::ollama(
            config.endpoint.clone(),
            api_key,
            config.model.clone(),
            max_tokens,
        )),
        ProviderKind::Anthropic => {
            Box::new(AnthropicAdapter::new(max_tokens, config.model.clone()))
        }
        ProviderKind::Custom => Box::new(GenericAPIAdapter::custom(
            config.endpoint.clone(),
            api_key,
            config.model.clone(),
            max_tokens,
            fallback_target(config),
        )),
        ProviderKind::Gemini => Box::new(GeminiAdapter::new(
            api_key,
            config.model.clone(),
            max_tokens,
            config.endpoint.clone(),
            config.api_version.clone(),
            config.streaming,
        )),
    }
}

fn fallback_target(config: &ClientConfig) -> Option<FallbackTarget> {
    FallbackTarget::from_parts(
        config.resolved_fallback_api_key(),
        config.fallback_endpoint.clone(),
        config.fallback_model.clone(),
    )
}
