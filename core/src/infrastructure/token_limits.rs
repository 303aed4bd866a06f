// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Built-in model → max completion tokens table.
//
// Names follow the provider's own model identifiers. A "provider/" prefix
// (e.g. "gemini/gemini-1.5-flash") is tolerated and stripped on lookup.

use std::collections::HashMap;

use crate::domain::token_limits::TokenLimitLookup;

const KNOWN_MODEL_LIMITS: &[(&str, u32)] = &[
    // OpenAI
    ("gpt-4o", 16_384),
    ("gpt-4o-mini", 16_384),
    ("gpt-4-turbo", 4_096),
    ("gpt-4", 4_096),
    ("gpt-3.5-turbo", 4_096),
    ("o1", 100_000),
    ("o1-mini", 65_536),
    ("o3-mini", 100_000),
    // Anthropic
    ("claude-3-5-sonnet-20241022", 8_192),
    ("claude-3-5-haiku-20241022", 8_192),
    ("claude-3-opus-20240229", 4_096),
    ("claude-3-haiku-20240307", 4_096),
    // Gemini
    ("gemini-1.5-pro", 8_192),
    ("gemini-1.5-flash", 8_192),
    ("gemini-2.0-flash", 8_192),
];

/// In-memory token limit table.
#[derive(Debug, Clone)]
pub struct StaticTokenLimits {
    limits: HashMap<String, u32>,
}

impl StaticTokenLimits {
    /// Table preloaded with well-known models.
    pub fn new() -> Self {
        Self::with_entries(
            KNOWN_MODEL_LIMITS
                .iter()
                .map(|(model, limit)| (model.to_string(), *limit)),
        )
    }

    /// Empty table; every lookup is unknown.
    pub fn empty() -> Self {
        Self {
            limits: HashMap::new(),
        }
    }

    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        Self {
            limits: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl Default for StaticTokenLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLimitLookup for StaticTokenLimits {
    fn max_tokens(&self, model: &str) -> Option<u32> {
        if let Some(limit) = self.limits.get(model) {
            return Some(*limit);
        }
        let (_, bare) = model.split_once('/')?;
        self.limits.get(bare).copied()
    }
}
