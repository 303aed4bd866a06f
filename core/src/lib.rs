// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Provider selection and LLM client construction.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Turns a [`ClientConfig`] into exactly one [`LLMProvider`] adapter

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
pub use application::llm_client::get_llm_client;
pub use infrastructure::llm::LLMClientFactory;
