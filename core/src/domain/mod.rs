// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Domain types shared by the factory and every adapter.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Owns the interfaces the infrastructure layer implements

pub mod client_config;
pub mod llm;
pub mod provider;
pub mod token_limits;

pub use client_config::ClientConfig;
pub use llm::{FinishReason, GenerationOptions, GenerationResponse, LLMError, LLMProvider, TokenUsage};
pub use provider::{ClientFactoryError, ProviderKind};
pub use token_limits::{ResolvedLimits, TokenLimitLookup};
