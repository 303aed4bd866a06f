// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Provider listing command

use anyhow::Result;
use colored::Colorize;

use llm_switch_core::domain::provider::ProviderKind;

/// Human-readable credential policy for a provider.
pub fn credential_note(kind: ProviderKind) -> &'static str {
    if kind.requires_api_key() {
        "api_key required"
    } else {
        "api_key optional (reads ANTHROPIC_API_KEY)"
    }
}

pub async fn list() -> Result<()> {
    println!("{}", "Supported providers:".bold());
    for kind in ProviderKind::ALL {
        println!(
            "  {} {}",
            format!("{:<10}", kind.as_str()).bold(),
            credential_note(kind).dimmed()
        );
    }
    Ok(())
}
