// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for llm-switch CLI

pub mod client;
pub mod config;
pub mod providers;

pub use self::client::ClientCommand;
pub use self::config::ConfigCommand;
