//! Google Gemini `generateContent` client.
//!
//! The model rides in the URL path and the key in a query parameter
//! rather than a header. Pure parsing in `extract_text` for testability.

use super::config::{GEMINI_ENDPOINT, ProviderConfig};
use super::types::{LlmError, api_error_message, classify_transport};
use super::{MAX_TOKENS, TEMPERATURE};

pub(super) async fn generate(
    http: &reqwest::Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, LlmError> {
    let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", config.model);
    let body = ApiRequest {
        contents: vec![Content { parts: vec![Part { text: prompt }] }],
        generation_config: GenerationConfig { max_output_tokens: MAX_TOKENS, temperature: TEMPERATURE },
    };

    let response = http
        .post(url)
        .query(&[("key", &config.api_key)])
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
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(serde::Deserialize)]
struct CandidatePart {
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

    let text = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
