// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Generic LLM Provider Adapter
//
// Anti-Corruption Layer for any server speaking the OpenAI chat completions
// format. One type serves both the Ollama and Custom provider kinds; they
// differ only in label, default endpoint and fallback support.

use async_trait::async_trait;

use super::http::FallbackTarget;
use super::openai_compat::{self, ChatCall, ChatTarget};
use crate::domain::llm::{GenerationOptions, GenerationResponse, LLMError, LLMProvider};
use crate::domain::provider::ProviderKind;

/// Ollama's OpenAI-compatible API on a default local install.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/v1";

pub struct GenericAPIAdapter {
    client: reqwest::Client,
    kind: ProviderKind,
    name: String,
    endpoint: Option<String>,
    api_key: String,
    model: String,
    max_tokens: u32,
    fallback: Option<FallbackTarget>,
}

impl GenericAPIAdapter {
    /// Adapter labelled "Ollama". No fallback support.
    pub fn ollama(endpoint: Option<String>, api_key: String, model: String, max_tokens: u32) -> Self {
        let endpoint = endpoint.or_else(|| Some(DEFAULT_OLLAMA_ENDPOINT.to_string()));
        Self::new(ProviderKind::Ollama, endpoint, api_key, model, "Ollama", max_tokens, None)
    }

    /// Adapter labelled "Custom" with an optional fallback endpoint.
    pub fn custom(
        endpoint: Option<String>,
        api_key: String,
        model: String,
        max_tokens: u32,
        fallback: Option<FallbackTarget>,
    ) -> Self {
        Self::new(ProviderKind::Custom, endpoint, api_key, model, "Custom", max_tokens, fallback)
    }

    fn new(
        kind: ProviderKind,
        endpoint: Option<String>,
        api_key: String,
        model: String,
        name: &str,
        max_tokens: u32,
        fallback: Option<FallbackTarget>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            kind,
            name: name.to_string(),
            endpoint,
            api_key,
            model,
            max_tokens,
            fallback,
        }
    }

    /// Family label ("Ollama" or "Custom")
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn fallback(&self) -> Option<&FallbackTarget> {
        self.fallback.as_ref()
    }

    fn primary(&self) -> Result<ChatTarget<'_>, LLMError> {
        let base_url = self.endpoint.as_deref().ok_or_else(|| {
            LLMError::InvalidInput(format!("No endpoint configured for {} provider", self.name))
        })?;
        Ok(ChatTarget {
            base_url,
            api_key: &self.api_key,
            api_version: None,
            model: &self.model,
        })
    }

    fn fallback_target(&self) -> Option<ChatTarget<'_>> {
        self.fallback.as_ref().map(|fb| ChatTarget {
            base_url: &fb.endpoint,
            api_key: &fb.api_key,
            api_version: None,
            model: &fb.model,
        })
    }
}

#[async_trait]
impl LLMProvider for GenericAPIAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let call = ChatCall {
            provider: &self.name,
            prompt,
            options,
            max_tokens: options.capped_max_tokens(self.max_tokens),
            stream: false,
        };
        match self.primary() {
            Ok(primary) => {
                openai_compat::chat_with_fallback(&self.client, &primary, self.fallback_target(), &call)
                    .await
            }
            // No primary endpoint: the fallback is the only usable target
            Err(e) => match self.fallback_target() {
                Some(fallback) => openai_compat::chat_completion(&self.client, &fallback, &call).await,
                None => Err(e),
            },
        }
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        openai_compat::list_models(&self.client, &self.primary()?).await
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
