// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each provider adapter translates between our domain interface and an external API.
// The factory is the only module that knows about all of them.

pub mod anthropic;
pub mod factory;
pub mod gemini;
pub mod generic;
mod http;
mod openai_compat;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use factory::LLMClientFactory;
pub use gemini::GeminiAdapter;
pub use generic::GenericAPIAdapter;
pub use http::FallbackTarget;
pub use openai::OpenAIAdapter;
