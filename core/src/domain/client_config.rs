// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Client Configuration Types
//
// Defines the configuration record consumed by the client factory:
// - Provider selection and credentials
// - Model and token limit defaults
// - Fallback credentials for adapters that support them
// - YAML loading, discovery and environment overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::provider::ProviderKind;

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "LLM_SWITCH_CONFIG_PATH";

/// Prefix marking a secret that must be read from the environment.
const ENV_SECRET_PREFIX: &str = "env:";

/// Everything the factory needs to build one client.
///
/// Read-only once loaded; the factory never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Provider literal ("openai", "ollama", "anthropic", "custom", "gemini")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL; adapters fall back to their vendor default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API version (Azure OpenAI `api-version`, Gemini path version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Token limit used when the model is absent from the limit table
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request streamed responses where the adapter supports it
    #[serde(default)]
    pub streaming: bool,

    /// Speech-to-text model (OpenAI only); the adapter uses `whisper-1` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,
}

fn default_provider() -> String {
    ProviderKind::OpenAI.as_str().to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    16384
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: default_model(),
            endpoint: None,
            api_version: None,
            max_tokens: default_max_tokens(),
            streaming: false,
            transcription_model: None,
            fallback_api_key: None,
            fallback_endpoint: None,
            fallback_model: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. LLM_SWITCH_CONFIG_PATH environment variable
    /// 2. ./llm-switch.yaml (working directory)
    /// 3. ~/.llm-switch/config.yaml (user home)
    /// 4. /etc/llm-switch/config.yaml (system, Unix) or C:\ProgramData\LlmSwitch\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./llm-switch.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".llm-switch").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/llm-switch/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\LlmSwitch\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_fields: [(&str, &mut Option<String>); 7] = [
            ("LLM_API_KEY", &mut self.api_key),
            ("LLM_ENDPOINT", &mut self.endpoint),
            ("LLM_API_VERSION", &mut self.api_version),
            ("TRANSCRIPTION_MODEL", &mut self.transcription_model),
            ("FALLBACK_API_KEY", &mut self.fallback_api_key),
            ("FALLBACK_ENDPOINT", &mut self.fallback_endpoint),
            ("FALLBACK_MODEL", &mut self.fallback_model),
        ];
        for (name, field) in string_fields {
            if let Some(val) = lookup(name) {
                tracing::debug!("Environment override: {}", name);
                *field = Some(val);
            }
        }

        if let Some(val) = lookup("LLM_PROVIDER") {
            tracing::info!("Environment override: LLM_PROVIDER={}", val);
            self.provider = val;
        }

        if let Some(val) = lookup("LLM_MODEL") {
            tracing::info!("Environment override: LLM_MODEL={}", val);
            self.model = val;
        }

        if let Some(val) = lookup("LLM_MAX_TOKENS") {
            match val.trim().parse::<u32>() {
                Ok(max_tokens) => {
                    tracing::info!("Environment override: LLM_MAX_TOKENS={}", max_tokens);
                    self.max_tokens = max_tokens;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for LLM_MAX_TOKENS: '{}'. Expected a positive integer. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Some(val) = lookup("LLM_STREAMING") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.streaming = true,
                "false" | "0" | "no" | "off" => self.streaming = false,
                _ => {
                    tracing::warn!(
                        "Invalid value for LLM_STREAMING: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Primary API key with `env:VAR` indirection resolved.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref())
    }

    /// Fallback API key with `env:VAR` indirection resolved.
    pub fn resolved_fallback_api_key(&self) -> Option<String> {
        resolve_secret(self.fallback_api_key.as_deref())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.provider
            .parse::<ProviderKind>()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if self.model.trim().is_empty() {
            anyhow::bail!("model cannot be empty");
        }

        if self.max_tokens == 0 {
            anyhow::bail!("max_tokens must be greater than zero");
        }

        let fallback_set = [
            self.fallback_api_key.is_some(),
            self.fallback_endpoint.is_some(),
            self.fallback_model.is_some(),
        ];
        if fallback_set.iter().any(|set| *set) && !fallback_set.iter().all(|set| *set) {
            anyhow::bail!(
                "fallback_api_key, fallback_endpoint and fallback_model must be set together"
            );
        }

        Ok(())
    }
}

/// Resolve "env:VAR_NAME" to the variable's value; plain values pass through.
///
/// An unset or empty variable resolves to `None`, so the credential policy
/// treats it exactly like a missing key.
pub fn resolve_secret(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) => match v.strip_prefix(ENV_SECRET_PREFIX) {
            Some(var_name) => std::env::var(var_name).ok().filter(|s| !s.is_empty()),
            None => Some(v.to_string()),
        },
        None => None,
    }
}
