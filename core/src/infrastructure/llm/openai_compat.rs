// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI-compatible chat completions wire format.
//
// Shared by the OpenAI adapter and the generic adapter (Ollama, vLLM, LM Studio
// and other servers that expose `/chat/completions`).

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::http::{error_for_status, health_status, join_url, network_error, read_sse_data};
use crate::domain::llm::{
    FinishReason, GenerationOptions, GenerationResponse, LLMError, TokenUsage,
};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Where a chat request goes and how it authenticates.
///
/// With `api_version` set the endpoint is treated as an Azure OpenAI deployment
/// URL: the key travels in `api-key` and the version as `?api-version=`.
pub(crate) struct ChatTarget<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub api_version: Option<&'a str>,
    pub model: &'a str,
}

impl ChatTarget<'_> {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_version {
            Some(version) => request
                .header("api-key", self.api_key)
                .query(&[("api-version", version)]),
            None if self.api_key.is_empty() => request,
            None => request.bearer_auth(self.api_key),
        }
    }
}

/// What is being asked, independent of the target.
pub(crate) struct ChatCall<'a> {
    pub provider: &'a str,
    pub prompt: &'a str,
    pub options: &'a GenerationOptions,
    pub max_tokens: u32,
    pub stream: bool,
}

pub(crate) async fn chat_completion(
    client: &reqwest::Client,
    target: &ChatTarget<'_>,
    call: &ChatCall<'_>,
) -> Result<GenerationResponse, LLMError> {
    if call.prompt.trim().is_empty() {
        return Err(LLMError::InvalidInput("prompt is empty".into()));
    }

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &call.options.system_prompt {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: call.prompt.to_string(),
    });

    let request = ChatRequest {
        model: target.model,
        messages,
        max_tokens: call.max_tokens,
        temperature: call.options.temperature,
        stop: call.options.stop_sequences.clone(),
        stream: call.stream,
        stream_options: call.stream.then_some(StreamOptions { include_usage: true }),
    };

    let url = join_url(target.base_url, "chat/completions");
    debug!(provider = call.provider, model = target.model, stream = call.stream, "POST {}", url);

    let response = target
        .authorize(client.post(&url))
        .json(&request)
        .send()
        .await
        .map_err(network_error)?;

    if !response.status().is_success() {
        return Err(error_for_status(response, target.model).await);
    }

    if call.stream {
        return collect_stream(response, call.provider, target.model).await;
    }

    let chat_response: ChatResponse = response
        .json()
        .await
        .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;

    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::Provider("No response from model".into()))?;

    Ok(GenerationResponse {
        text: choice.message.content,
        usage: chat_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default(),
        provider: call.provider.to_string(),
        model: target.model.to_string(),
        finish_reason: finish_reason(choice.finish_reason.as_deref()),
    })
}

/// Try `primary`, then `fallback` once if the error allows it.
pub(crate) async fn chat_with_fallback(
    client: &reqwest::Client,
    primary: &ChatTarget<'_>,
    fallback: Option<ChatTarget<'_>>,
    call: &ChatCall<'_>,
) -> Result<GenerationResponse, LLMError> {
    match chat_completion(client, primary, call).await {
        Ok(response) => Ok(response),
        Err(e) => match fallback {
            Some(fallback) if e.allows_fallback() => {
                warn!(
                    provider = call.provider,
                    model = primary.model,
                    fallback_model = fallback.model,
                    "Primary endpoint failed ({}), retrying with fallback",
                    e
                );
                chat_completion(client, &fallback, call).await
            }
            _ => Err(e),
        },
    }
}

async fn collect_stream(
    response: reqwest::Response,
    provider: &str,
    model: &str,
) -> Result<GenerationResponse, LLMError> {
    let mut text = String::new();
    let mut usage = TokenUsage::default();
    let mut reason: Option<String> = None;

    read_sse_data(response, |data| {
        let chunk: ChatChunk = serde_json::from_str(data)
            .map_err(|e| LLMError::Provider(format!("Failed to parse stream chunk: {}", e)))?;
        for choice in chunk.choices {
            if let Some(content) = choice.delta.content {
                text.push_str(&content);
            }
            if choice.finish_reason.is_some() {
                reason = choice.finish_reason;
            }
        }
        if let Some(u) = chunk.usage {
            usage = TokenUsage::new(u.prompt_tokens, u.completion_tokens);
        }
        Ok(())
    })
    .await?;

    Ok(GenerationResponse {
        text,
        usage,
        provider: provider.to_string(),
        model: model.to_string(),
        finish_reason: finish_reason(reason.as_deref()),
    })
}

pub(crate) async fn list_models(
    client: &reqwest::Client,
    target: &ChatTarget<'_>,
) -> Result<(), LLMError> {
    let url = join_url(target.base_url, "models");

    let response = target
        .authorize(client.get(&url))
        .send()
        .await
        .map_err(network_error)?;

    health_status(response.status())
}

pub(crate) async fn transcribe(
    client: &reqwest::Client,
    target: &ChatTarget<'_>,
    audio: Vec<u8>,
    file_name: &str,
) -> Result<String, LLMError> {
    if audio.is_empty() {
        return Err(LLMError::InvalidInput("audio is empty".into()));
    }

    let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
    let form = reqwest::multipart::Form::new()
        .text("model", target.model.to_string())
        .part("file", part);

    let url = join_url(target.base_url, "audio/transcriptions");
    let response = target
        .authorize(client.post(&url))
        .multipart(form)
        .send()
        .await
        .map_err(network_error)?;

    if !response.status().is_success() {
        return Err(error_for_status(response, target.model).await);
    }

    let transcription: TranscriptionResponse = response
        .json()
        .await
        .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;

    Ok(transcription.text)
}

fn finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}
