// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Token Limits
//!
//! Resolution of the effective token limit for a model.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Decides between a known per-model limit and the configured fallback

use std::collections::HashMap;

use super::client_config::ClientConfig;

/// Model name → maximum token count.
///
/// Implementations are in-memory and must not block. `None` means the model is
/// unknown, which is a normal outcome.
pub trait TokenLimitLookup: Send + Sync {
    fn max_tokens(&self, model: &str) -> Option<u32>;
}

impl TokenLimitLookup for HashMap<String, u32> {
    fn max_tokens(&self, model: &str) -> Option<u32> {
        self.get(model).copied()
    }
}

/// Limits derived for one construction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLimits {
    pub effective_max_tokens: u32,
}

impl ResolvedLimits {
    /// A known positive limit for `config.model` wins; otherwise
    /// `config.max_tokens` is used unchanged.
    pub fn resolve(lookup: &dyn TokenLimitLookup, config: &ClientConfig) -> Self {
        let effective_max_tokens = match lookup.max_tokens(&config.model) {
            Some(limit) if limit > 0 => limit,
            _ => config.max_tokens,
        };
        Self {
            effective_max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(model: &str, max_tokens: u32) -> ClientConfig {
        ClientConfig {
            model: model.to_string(),
            max_tokens,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_known_limit_wins_over_config() {
        let table = HashMap::from([("known-model".to_string(), 8192)]);
        let limits = ResolvedLimits::resolve(&table, &config_for("known-model", 4096));
        assert_eq!(limits.effective_max_tokens, 8192);
    }

    #[test]
    fn test_known_smaller_limit_still_wins() {
        let table = HashMap::from([("small-model".to_string(), 1024)]);
        let limits = ResolvedLimits::resolve(&table, &config_for("small-model", 4096));
        assert_eq!(limits.effective_max_tokens, 1024);
    }

    #[test]
    fn test_unknown_model_uses_config() {
        let table: HashMap<String, u32> = HashMap::new();
        let limits = ResolvedLimits::resolve(&table, &config_for("mystery", 4096));
        assert_eq!(limits.effective_max_tokens, 4096);
    }

    #[test]
    fn test_zero_entry_treated_as_unknown() {
        let table = HashMap::from([("zero-model".to_string(), 0)]);
        let limits = ResolvedLimits::resolve(&table, &config_for("zero-model", 4096));
        assert_eq!(limits.effective_max_tokens, 4096);
    }
}
