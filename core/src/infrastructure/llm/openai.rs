// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI LLM Provider Adapter
//
// Anti-Corruption Layer for the OpenAI API (and Azure OpenAI when an
// api_version is configured). Supports a fallback endpoint, streamed
// completions and audio transcription.

use async_trait::async_trait;

use super::http::FallbackTarget;
use super::openai_compat::{self, ChatCall, ChatTarget};
use crate::domain::llm::{GenerationOptions, GenerationResponse, LLMError, LLMProvider};
use crate::domain::provider::ProviderKind;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

pub struct OpenAIAdapter {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: Option<String>,
    model: String,
    transcription_model: String,
    max_tokens: u32,
    streaming: bool,
    fallback: Option<FallbackTarget>,
}

impl OpenAIAdapter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_key: String,
        endpoint: Option<String>,
        api_version: Option<String>,
        model: String,
        transcription_model: Option<String>,
        max_tokens: u32,
        streaming: bool,
        fallback: Option<FallbackTarget>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string()),
            api_version,
            model,
            transcription_model: transcription_model
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            max_tokens,
            streaming,
            fallback,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }

    pub fn transcription_model(&self) -> &str {
        &self.transcription_model
    }

    pub fn fallback(&self) -> Option<&FallbackTarget> {
        self.fallback.as_ref()
    }

    /// Transcribe an audio file with the configured transcription model.
    pub async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, LLMError> {
        let target = ChatTarget {
            model: &self.transcription_model,
            ..self.primary()
        };
        openai_compat::transcribe(&self.client, &target, audio, file_name).await
    }

    fn primary(&self) -> ChatTarget<'_> {
        ChatTarget {
            base_url: &self.endpoint,
            api_key: &self.api_key,
            api_version: self.api_version.as_deref(),
            model: &self.model,
        }
    }

    /// The fallback is a plain OpenAI-compatible endpoint with bearer auth,
    /// even when the primary is an Azure deployment.
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
impl LLMProvider for OpenAIAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let call = ChatCall {
            provider: ProviderKind::OpenAI.as_str(),
            prompt,
            options,
            max_tokens: options.capped_max_tokens(self.max_tokens),
            stream: self.streaming,
        };
        openai_compat::chat_with_fallback(&self.client, &self.primary(), self.fallback_target(), &call)
            .await
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        openai_compat::list_models(&self.client, &self.primary()).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
