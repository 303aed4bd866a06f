// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Concrete implementations of the domain interfaces.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Vendor adapters, the client factory and the built-in token-limit table

pub mod llm;
pub mod token_limits;

pub use token_limits::StaticTokenLimits;
