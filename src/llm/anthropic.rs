//! Anthropic Messages API client.
//!
//! Auth rides in `x-api-key` plus a pinned `anthropic-version` header.
//! Pure parsing in `extract_text` for testability.

use super::MAX_TOKENS;
use super::config::{ANTHROPIC_ENDPOINT, ProviderConfig};
use super::types::{LlmError, api_error_message, classify_transport};

const API_VERSION: &str = "2023-06-01";

pub(super) async fn generate(
    http: &reqwest::Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, LlmError> {
    let body = ApiRequest {
        model: &config.model,
        max_tokens: MAX_TOKENS,
        messages: vec![WireMessage { role: "user", content: prompt }],
    };

    let response = http
        .post(ANTHROPIC_ENDPOINT)
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", API_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(|e| classify_transport(&e))?;

    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| classify_transport(&e))?;

    if !(200..300).contains(&status) {
        return Err(LlmError::ProviderApi { status: Some(status), message: api_error_message(&text) });
    }

    extract_text(&text)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(serde::Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ApiError>,
}

#[derive(serde::Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(serde::Deserialize)]
struct ApiError {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn extract_text(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    if let Some(err) = api.error {
        return Err(LlmError::ProviderApi { status: None, message: err.message });
    }

    let text = api.content.into_iter().next().map(|b| b.text).unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
