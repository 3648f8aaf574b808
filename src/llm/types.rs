//! Provider-neutral LLM error taxonomy.
//!
//! Errors here are worded for end users: every variant's display string is
//! shown verbatim as a transient notification or chat reply.

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Prompt, API key or model id absent. No network call is made.
    #[error("missing {field} — fill it in before sending a request")]
    ConfigMissing { field: &'static str },

    /// The provider hostname did not resolve.
    #[error("cannot reach the AI service: name resolution failed. Check your network connection or switch API endpoints")]
    DnsFailure,

    /// TCP/TLS connectivity failure.
    #[error("network connection failed. Check connectivity and the API endpoint configuration")]
    ConnectFailure,

    /// Any other transport failure (timeout, aborted body, protocol error).
    #[error("network request failed: {0}")]
    Transport(String),

    /// Non-2xx HTTP response, or an explicit error payload in a 2xx body.
    /// The message is the provider's own.
    #[error("AI provider error: {message}")]
    ProviderApi { status: Option<u16>, message: String },

    /// 2xx response with no extractable text and no error field either.
    #[error(
        "the AI service returned an empty response. Possible causes: \
         exhausted API quota, a request the model could not interpret, or a \
         network problem. Check that the API key is valid, rephrase the \
         request, or try again later"
    )]
    EmptyResponse,

    /// Response body did not match the provider's documented JSON shape.
    #[error("could not parse the provider response: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigMissing { .. } => "E_CONFIG_MISSING",
            Self::DnsFailure => "E_DNS_FAILURE",
            Self::ConnectFailure => "E_CONNECT_FAILURE",
            Self::Transport(_) => "E_TRANSPORT",
            Self::ProviderApi { .. } => "E_PROVIDER_API",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
            Self::Parse(_) => "E_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::DnsFailure
                | Self::ConnectFailure
                | Self::Transport(_)
                | Self::ProviderApi { status: Some(429 | 500..=599), .. }
        )
    }
}

/// Map a reqwest transport failure onto the taxonomy. Name-resolution
/// failures get their own message; generic connect failures another; the
/// rest keep the transport detail.
pub(crate) fn classify_transport(err: &reqwest::Error) -> LlmError {
    let mut chain: Vec<String> = Vec::new();
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        chain.push(e.to_string());
        source = e.source();
    }
    let full = chain.join(": ");

    if full.contains("dns error") || full.contains("failed to lookup address") {
        LlmError::DnsFailure
    } else if err.is_connect() {
        LlmError::ConnectFailure
    } else {
        LlmError::Transport(full)
    }
}

/// Pull a human-readable message out of a non-2xx response body.
///
/// Providers disagree on the envelope (`{"error":{"message":..}}` vs a
/// top-level `message`), so try both before falling back to the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.pointer("/error/message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let head: String = trimmed.chars().take(200).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
