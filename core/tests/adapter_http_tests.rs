// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP-level tests for the provider adapters against mock servers.

use llm_switch_core::domain::llm::{FinishReason, GenerationOptions, LLMError, LLMProvider};
use llm_switch_core::domain::ClientConfig;
use llm_switch_core::infrastructure::llm::{
    AnthropicAdapter, FallbackTarget, GeminiAdapter, GenericAPIAdapter, OpenAIAdapter,
};
use llm_switch_core::LLMClientFactory;
use mockito::Matcher;
use serde_json::json;

const CHAT_OK: &str = r#"{
    "choices": [{"message": {"role": "assistant", "content": "Hello there"}, "finish_reason": "stop"}],
    "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
}"#;

fn openai(endpoint: String, streaming: bool, fallback: Option<FallbackTarget>) -> OpenAIAdapter {
    OpenAIAdapter::new(
        "sk-primary".to_string(),
        Some(endpoint),
        None,
        "gpt-4o-mini".to_string(),
        None,
        1024,
        streaming,
        fallback,
    )
}

#[tokio::test]
async fn test_openai_generate() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-primary")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 256
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = openai(server.url(), false, None);
    let options = GenerationOptions {
        max_tokens: Some(256),
        ..GenerationOptions::default()
    };
    let response = adapter.generate("Hi", &options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text, "Hello there");
    assert_eq!(response.usage.total_tokens, 7);
    assert_eq!(response.provider, "openai");
    assert_eq!(response.finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn test_openai_oversized_usage_saturates() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 4294967295, "completion_tokens": 1}
            }"#,
        )
        .create_async()
        .await;

    let adapter = openai(server.url(), false, None);
    let response = adapter
        .generate("Hi", &GenerationOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.usage.prompt_tokens, u32::MAX);
    assert_eq!(response.usage.total_tokens, u32::MAX);
}

#[tokio::test]
async fn test_openai_request_capped_at_resolved_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"max_tokens": 1024})))
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = openai(server.url(), false, None);
    let options = GenerationOptions {
        max_tokens: Some(50_000),
        ..GenerationOptions::default()
    };
    adapter.generate("Hi", &options).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_azure_style_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2024-02-01".into()))
        .match_header("api-key", "azure-key")
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = OpenAIAdapter::new(
        "azure-key".to_string(),
        Some(server.url()),
        Some("2024-02-01".to_string()),
        "gpt-4o".to_string(),
        None,
        1024,
        false,
        None,
    );
    adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_streaming_aggregates_deltas() {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"length\"}]}\n\n",
        "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":4,\"completion_tokens\":2}}\n\n",
        "data: [DONE]\n\n",
    );
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let adapter = openai(server.url(), true, None);
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text, "Hello");
    assert_eq!(response.finish_reason, FinishReason::Length);
    assert_eq!(response.usage.total_tokens, 6);
}

#[tokio::test]
async fn test_openai_fallback_on_primary_failure() {
    let mut primary = mockito::Server::new_async().await;
    let mut secondary = mockito::Server::new_async().await;

    let primary_mock = primary
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;
    let fallback_mock = secondary
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-fallback")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o"})))
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let fallback = FallbackTarget::from_parts(
        Some("sk-fallback".to_string()),
        Some(secondary.url()),
        Some("gpt-4o".to_string()),
    );
    let adapter = openai(primary.url(), false, fallback);
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    primary_mock.assert_async().await;
    fallback_mock.assert_async().await;
    assert_eq!(response.model, "gpt-4o");
}

#[tokio::test]
async fn test_azure_primary_falls_back_with_bearer_auth() {
    let mut primary = mockito::Server::new_async().await;
    let mut secondary = mockito::Server::new_async().await;

    let primary_mock = primary
        .mock("POST", "/chat/completions")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2024-02-01".into()))
        .match_header("api-key", "azure-key")
        .with_status(503)
        .create_async()
        .await;
    let fallback_mock = secondary
        .mock("POST", "/chat/completions")
        .match_query(Matcher::Missing)
        .match_header("authorization", "Bearer sk-fallback")
        .match_header("api-key", Matcher::Missing)
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = OpenAIAdapter::new(
        "azure-key".to_string(),
        Some(primary.url()),
        Some("2024-02-01".to_string()),
        "gpt-4o".to_string(),
        None,
        1024,
        false,
        FallbackTarget::from_parts(
            Some("sk-fallback".to_string()),
            Some(secondary.url()),
            Some("gpt-4o-mini".to_string()),
        ),
    );
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    primary_mock.assert_async().await;
    fallback_mock.assert_async().await;
    assert_eq!(response.model, "gpt-4o-mini");
}

#[tokio::test]
async fn test_openai_error_mapping_without_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("bad key")
        .create_async()
        .await;

    let adapter = openai(server.url(), false, None);
    let result = adapter.generate("Hi", &GenerationOptions::default()).await;
    assert!(matches!(result, Err(LLMError::Authentication(_))));
}

#[tokio::test]
async fn test_openai_transcription() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/audio/transcriptions")
        .match_header("authorization", "Bearer sk-primary")
        .with_status(200)
        .with_body(r#"{"text": "hello world"}"#)
        .create_async()
        .await;

    let adapter = openai(server.url(), false, None);
    let text = adapter
        .transcribe(b"RIFF....WAVE".to_vec(), "clip.wav")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn test_generic_custom_labels_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer custom-key")
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = GenericAPIAdapter::custom(
        Some(server.url()),
        "custom-key".to_string(),
        "mixtral-8x7b".to_string(),
        2048,
        None,
    );
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();
    assert_eq!(response.provider, "Custom");
    assert_eq!(response.model, "mixtral-8x7b");
}

#[tokio::test]
async fn test_generic_custom_fallback_on_rate_limit() {
    let mut primary = mockito::Server::new_async().await;
    let mut secondary = mockito::Server::new_async().await;
    primary
        .mock("POST", "/chat/completions")
        .with_status(429)
        .create_async()
        .await;
    let fallback_mock = secondary
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let adapter = GenericAPIAdapter::custom(
        Some(primary.url()),
        "custom-key".to_string(),
        "primary-model".to_string(),
        2048,
        FallbackTarget::from_parts(
            Some("fb-key".to_string()),
            Some(secondary.url()),
            Some("fallback-model".to_string()),
        ),
    );
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    fallback_mock.assert_async().await;
    assert_eq!(response.model, "fallback-model");
}

#[tokio::test]
async fn test_ollama_built_by_factory_hits_configured_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "llama3.2", "max_tokens": 4096})))
        .with_status(200)
        .with_body(CHAT_OK)
        .create_async()
        .await;

    let config = ClientConfig {
        provider: "ollama".to_string(),
        api_key: Some("ollama".to_string()),
        model: "llama3.2".to_string(),
        endpoint: Some(server.url()),
        max_tokens: 4096,
        ..ClientConfig::default()
    };
    let client = LLMClientFactory::default().create(&config).unwrap();
    let response = client.generate("Hi", &GenerationOptions::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.provider, "Ollama");
}

#[tokio::test]
async fn test_generic_health_check() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    let adapter = GenericAPIAdapter::ollama(Some(server.url()), "ollama".into(), "llama3.2".into(), 4096);
    assert!(adapter.health_check().await.is_ok());
}

#[tokio::test]
async fn test_anthropic_generate() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 8192
        })))
        .with_status(200)
        .with_body(
            r#"{
                "content": [{"type": "text", "text": "Bonjour"}],
                "usage": {"input_tokens": 10, "output_tokens": 3},
                "stop_reason": "max_tokens"
            }"#,
        )
        .create_async()
        .await;

    let adapter = AnthropicAdapter::new(8192, "claude-3-5-sonnet-20241022".to_string())
        .with_api_key("ak-test")
        .with_base_url(server.url());
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text, "Bonjour");
    assert_eq!(response.usage.total_tokens, 13);
    assert_eq!(response.finish_reason, FinishReason::Length);
}

#[tokio::test]
async fn test_gemini_generate() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_header("x-goog-api-key", "gk-test")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {"maxOutputTokens": 8192}
        })))
        .with_status(200)
        .with_body(
            r#"{
                "candidates": [{"content": {"parts": [{"text": "Hola"}], "role": "model"}, "finishReason": "STOP"}],
                "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 1, "totalTokenCount": 5}
            }"#,
        )
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(
        "gk-test".to_string(),
        "gemini/gemini-1.5-flash".to_string(),
        8192,
        Some(server.url()),
        None,
        false,
    );
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text, "Hola");
    assert_eq!(response.usage.total_tokens, 5);
    assert_eq!(response.provider, "gemini");
}

#[tokio::test]
async fn test_gemini_streaming() {
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Ho\"}]}}]}\r\n\r\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"la\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
    );
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/models/gemini-2.0-flash:streamGenerateContent")
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(
        "gk-test".to_string(),
        "gemini-2.0-flash".to_string(),
        8192,
        Some(server.url()),
        Some("v1".to_string()),
        true,
    );
    let response = adapter.generate("Hi", &GenerationOptions::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text, "Hola");
    assert_eq!(response.finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn test_gemini_model_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-9:generateContent")
        .with_status(404)
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(
        "gk-test".to_string(),
        "gemini-9".to_string(),
        8192,
        Some(server.url()),
        None,
        false,
    );
    let result = adapter.generate("Hi", &GenerationOptions::default()).await;
    assert!(matches!(result, Err(LLMError::ModelNotFound(ref m)) if m == "gemini-9"));
}
