// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gemini LLM Provider Adapter
//
// Anti-Corruption Layer for the Google Generative Language API
// (`generateContent` / `streamGenerateContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{error_for_status, health_status, join_url, network_error, read_sse_data};
use crate::domain::llm::{
    FinishReason, GenerationOptions, GenerationResponse, LLMError, LLMProvider, TokenUsage,
};
use crate::domain::provider::ProviderKind;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_API_VERSION: &str = "v1beta";

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: String,
    api_version: String,
    streaming: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Text, finish reason and usage accumulated over one or more response chunks.
#[derive(Default)]
struct Accumulated {
    text: String,
    finish_reason: Option<FinishReason>,
    usage: TokenUsage,
}

impl Accumulated {
    fn absorb(&mut self, response: GeminiResponse) {
        if response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .is_some()
        {
            self.finish_reason = Some(FinishReason::ContentFilter);
        }
        if let Some(candidate) = response.candidates.into_iter().next() {
            if let Some(content) = candidate.content {
                for part in content.parts {
                    if let Some(text) = part.text {
                        self.text.push_str(&text);
                    }
                }
            }
            if let Some(reason) = candidate.finish_reason.as_deref() {
                self.finish_reason = Some(finish_reason(reason));
            }
        }
        if let Some(usage) = response.usage_metadata {
            self.usage = TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count);
        }
    }
}

impl GeminiAdapter {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        endpoint: Option<String>,
        api_version: Option<String>,
        streaming: bool,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            max_tokens,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            api_version: api_version.unwrap_or_else(|| DEFAULT_GEMINI_API_VERSION.to_string()),
            streaming,
        }
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Model id as the REST path expects it ("gemini/..." and "models/..." stripped).
    fn model_path(&self) -> &str {
        let model = self.model.strip_prefix("gemini/").unwrap_or(&self.model);
        model.strip_prefix("models/").unwrap_or(model)
    }

    fn method_url(&self) -> String {
        let method = if self.streaming {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        join_url(
            &self.endpoint,
            &format!("{}/models/{}:{}", self.api_version, self.model_path(), method),
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        if prompt.trim().is_empty() {
            return Err(LLMError::InvalidInput("prompt is empty".into()));
        }

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            system_instruction: options.system_prompt.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(system.clone()),
                }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: options.capped_max_tokens(self.max_tokens),
                temperature: options.temperature,
                stop_sequences: options.stop_sequences.clone(),
            },
        };

        let mut http_request = self
            .client
            .post(self.method_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request);
        if self.streaming {
            http_request = http_request.query(&[("alt", "sse")]);
        }

        let response = http_request.send().await.map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_for_status(response, &self.model).await);
        }

        let mut accumulated = Accumulated::default();
        if self.streaming {
            read_sse_data(response, |data| {
                let chunk: GeminiResponse = serde_json::from_str(data).map_err(|e| {
                    LLMError::Provider(format!("Failed to parse stream chunk: {}", e))
                })?;
                accumulated.absorb(chunk);
                Ok(())
            })
            .await?;
        } else {
            let gemini_response: GeminiResponse = response
                .json()
                .await
                .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;
            accumulated.absorb(gemini_response);
        }

        Ok(GenerationResponse {
            text: accumulated.text,
            usage: accumulated.usage,
            provider: ProviderKind::Gemini.as_str().to_string(),
            model: self.model.clone(),
            finish_reason: accumulated.finish_reason.unwrap_or(FinishReason::Stop),
        })
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        let url = join_url(&self.endpoint, &format!("{}/models", self.api_version));

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(network_error)?;

        health_status(response.status())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Stop,
    }
}
