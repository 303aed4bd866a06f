// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Shared HTTP plumbing for the provider adapters: status → LLMError mapping,
// URL joining and server-sent-event decoding.

use futures::StreamExt;
use reqwest::{Response, StatusCode};

use crate::domain::llm::LLMError;

/// Secondary credentials an adapter switches to when the primary endpoint fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTarget {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl FallbackTarget {
    /// All three parts are required; a partial triple disables fallback.
    pub fn from_parts(
        api_key: Option<String>,
        endpoint: Option<String>,
        model: Option<String>,
    ) -> Option<Self> {
        match (api_key, endpoint, model) {
            (Some(api_key), Some(endpoint), Some(model)) => Some(Self {
                api_key,
                endpoint,
                model,
            }),
            _ => None,
        }
    }
}

pub(crate) fn network_error(e: reqwest::Error) -> LLMError {
    LLMError::Network(e.to_string())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Consume a non-success response and translate it into a domain error.
pub(crate) async fn error_for_status(response: Response, model: &str) -> LLMError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    status_error(status, error_text, model)
}

pub(crate) fn status_error(status: StatusCode, error_text: String, model: &str) -> LLMError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        LLMError::Authentication(error_text)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        LLMError::RateLimit
    } else if status == StatusCode::NOT_FOUND {
        LLMError::ModelNotFound(model.to_string())
    } else {
        LLMError::Provider(format!("HTTP {}: {}", status, error_text))
    }
}

/// Health probes only distinguish "reachable", "bad credentials" and "other".
pub(crate) fn health_status(status: StatusCode) -> Result<(), LLMError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(LLMError::Authentication("Invalid API key".into()))
    } else {
        Err(LLMError::Network(format!("HTTP {}", status)))
    }
}

/// Feed every `data:` payload of an SSE body to `on_data`, stopping at `[DONE]`.
pub(crate) async fn read_sse_data<F>(response: Response, mut on_data: F) -> Result<(), LLMError>
where
    F: FnMut(&str) -> Result<(), LLMError>,
{
    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(network_error)?;
        buffer.extend_from_slice(&chunk);

        while let Some(frame) = take_sse_frame(&mut buffer) {
            let frame = String::from_utf8_lossy(&frame);
            if let Some(data) = sse_frame_data(&frame) {
                if data == "[DONE]" {
                    return Ok(());
                }
                on_data(&data)?;
            }
        }
    }

    // Servers may close without a trailing blank line
    if !buffer.is_empty() {
        let frame = String::from_utf8_lossy(&buffer).into_owned();
        if let Some(data) = sse_frame_data(&frame) {
            if data != "[DONE]" {
                on_data(&data)?;
            }
        }
    }

    Ok(())
}

fn take_sse_frame(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let crlf = buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| (pos, 4));
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|pos| (pos, 2));
    // Earliest delimiter wins so mixed line endings split correctly
    let (pos, delimiter_len) = match (crlf, lf) {
        (Some(a), Some(b)) => std::cmp::min(a, b),
        (a, b) => a.or(b)?,
    };

    let frame = buffer.drain(..pos).collect::<Vec<u8>>();
    buffer.drain(..delimiter_len);
    Some(frame)
}

fn sse_frame_data(frame: &str) -> Option<String> {
    let data_parts: Vec<&str> = frame
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with(':'))
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();

    if data_parts.is_empty() {
        return None;
    }
    Some(data_parts.join("\n"))
}
