//! OpenAI Chat Completions client.
//!
//! Also serves custom OpenAI-compatible endpoints, which share the wire
//! shape and bearer auth and differ only in URL. Pure parsing in
//! `extract_text` for testability.

use super::config::{OPENAI_ENDPOINT, ProviderConfig, ProviderKind};
use super::types::{LlmError, api_error_message, classify_transport};
use super::{MAX_TOKENS, TEMPERATURE};

pub(super) async fn generate(
    http: &reqwest::Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, LlmError> {
    let url = match config.provider {
        ProviderKind::Custom => config.custom_endpoint.as_deref().unwrap_or(OPENAI_ENDPOINT),
        _ => OPENAI_ENDPOINT,
    };
    let body = ApiRequest {
        model: &config.model,
        messages: vec![WireMessage { role: "user", content: prompt }],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let response = http
        .post(url)
        .bearer_auth(&config.api_key)
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
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(serde::Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
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

    let text = api
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
