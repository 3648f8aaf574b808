//! DESIGN
//! ======
//!
//! AI provider adapter. One trait (`GenerateText`) at the seam so the
//! services and tests never touch HTTP, and one concrete implementation
//! (`ProviderClient`) that maps a [`ProviderConfig`] onto the wire shape
//! each vendor expects.
//!
//! Every provider module follows the same split: a private `generate`
//! function that owns the HTTP exchange, and a pure `extract_text`
//! function that normalizes the response body. The pure half is where
//! the tests live.

use async_trait::async_trait;
use std::time::Duration;

pub mod config;
pub mod postprocess;
pub mod types;

mod anthropic;
mod gemini;
mod openai;
mod qwen;

use config::{ProviderConfig, ProviderKind};
use types::LlmError;

/// Token and sampling defaults applied to every provider request.
pub const MAX_TOKENS: u32 = 2000;
pub const TEMPERATURE: f64 = 0.7;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Single-turn text generation against whichever provider is configured.
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// Send `prompt` and return the assistant's raw text reply.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] classifying config, transport, provider,
    /// and parse failures separately so callers can phrase them.
    async fn generate(&self, config: &ProviderConfig, prompt: &str) -> Result<String, LlmError>;
}

/// HTTP-backed implementation dispatching on [`ProviderKind`].
pub struct ProviderClient {
    http: reqwest::Client,
}

impl ProviderClient {
    /// Build the client with shared connect/request timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new() -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl GenerateText for ProviderClient {
    async fn generate(&self, config: &ProviderConfig, prompt: &str) -> Result<String, LlmError> {
        config.validate()?;
        let text = match config.provider {
            ProviderKind::OpenAi | ProviderKind::Custom => {
                openai::generate(&self.http, config, prompt).await?
            }
            ProviderKind::Anthropic => anthropic::generate(&self.http, config, prompt).await?,
            ProviderKind::Gemini => gemini::generate(&self.http, config, prompt).await?,
            ProviderKind::Qwen => qwen::generate(&self.http, config, prompt).await?,
        };
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}
