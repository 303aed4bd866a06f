// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use llm_switch::commands::client::describe_resolution;
use llm_switch::commands::config::{generate, validate};
use llm_switch_core::domain::client_config::ClientConfig;
use llm_switch_core::domain::provider::ProviderKind;

#[tokio::test]
async fn test_generated_config_validates() {
    let dir = tempfile::tempdir().unwrap();

    for examples in [false, true] {
        let path = dir.path().join(format!("config-{}.yaml", examples));
        generate(&path, examples).await.unwrap();

        let config = ClientConfig::from_yaml_file(&path).unwrap();
        assert!(config.validate().is_ok());
    }
}

#[tokio::test]
async fn test_validate_rejects_unknown_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "provider: bedrock\nmodel: titan\n").unwrap();

    assert!(validate(Some(path)).await.is_err());
}

#[tokio::test]
async fn test_validate_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(validate(Some(dir.path().join("absent.yaml"))).await.is_err());
}

#[test]
fn test_resolution_prefers_known_model_limit() {
    let config = ClientConfig {
        provider: "anthropic".to_string(),
        model: "claude-3-5-sonnet-20241022".to_string(),
        max_tokens: 1000,
        ..ClientConfig::default()
    };

    let (kind, limits) = describe_resolution(&config).unwrap();
    assert_eq!(kind, ProviderKind::Anthropic);
    assert_eq!(limits.effective_max_tokens, 8192);
}

#[test]
fn test_resolution_rejects_unknown_provider() {
    let config = ClientConfig {
        provider: "bedrock".to_string(),
        ..ClientConfig::default()
    };
    assert!(describe_resolution(&config).is_err());
}

#[tokio::test]
async fn test_validate_file_ignores_environment_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llm-switch.yaml");
    std::fs::write(&path, "provider: ollama\nmodel: llama3.2\n").unwrap();

    std::env::set_var("LLM_PROVIDER", "bedrock");
    let result = validate(Some(path)).await;
    std::env::remove_var("LLM_PROVIDER");

    let config = result.unwrap();
    assert_eq!(config.provider, "ollama");
}
