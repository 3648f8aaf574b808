//! Qwen (DashScope) text-generation client.
//!
//! Bearer auth like OpenAI but a nested `input`/`parameters` envelope,
//! and errors reported as a top-level `code`/`message` pair. Pure
//! parsing in `extract_text` for testability.

use super::config::{ProviderConfig, QWEN_ENDPOINT};
use super::types::{LlmError, api_error_message, classify_transport};
use super::{MAX_TOKENS, TEMPERATURE};

pub(super) async fn generate(
    http: &reqwest::Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, LlmError> {
    let body = ApiRequest {
        model: &config.model,
        input: Input { messages: vec![WireMessage { role: "user", content: prompt }] },
        parameters: Parameters { max_tokens: MAX_TOKENS, temperature: TEMPERATURE },
    };

    let response = http
        .post(QWEN_ENDPOINT)
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
    input: Input<'a>,
    parameters: Parameters,
}

#[derive(serde::Serialize)]
struct Input<'a> {
    messages: Vec<WireMessage<'a>>,
}

#[derive(serde::Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Serialize)]
struct Parameters {
    max_tokens: u32,
    temperature: f64,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    output: Option<Output>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(serde::Deserialize)]
struct Output {
    #[serde(default)]
    text: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn extract_text(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = api.output.map(|o| o.text).unwrap_or_default();
    if !text.trim().is_empty() {
        return Ok(text);
    }

    if let Some(message) = api.message {
        let message = match api.code {
            Some(code) if !code.is_empty() => format!("{code}: {message}"),
            _ => message,
        };
        return Err(LlmError::ProviderApi { status: None, message });
    }

    Err(LlmError::EmptyResponse)
}

#[cfg(test)]
#[path = "qwen_test.rs"]
mod tests;
