// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Use cases that wire the configuration source to the client factory.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Client acquisition entry points

pub mod llm_client;
