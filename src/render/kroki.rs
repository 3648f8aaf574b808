//! External diagram renderer behind a trait.
//!
//! DESIGN
//! ======
//! The studio never parses or lays out diagrams itself. Rendering is a black
//! box call: source text in, SVG markup or a descriptive error out. The
//! production implementation posts to a Kroki-compatible service; tests
//! substitute mocks.

use std::time::Duration;

use crate::error::ErrorCode;

const DEFAULT_RENDERER_URL: &str = "https://kroki.io";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer rejected the source. The message is the renderer's own
    /// diagnostic and is shown verbatim in the error panel.
    #[error("{0}")]
    InvalidSource(String),

    /// Transport-level failure talking to the render service.
    #[error("render service unreachable: {0}")]
    Http(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSource(_) => "E_RENDER_INVALID_SOURCE",
            Self::Http(_) => "E_RENDER_HTTP",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// A successfully rendered diagram. `id` is the request id it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    pub id: u64,
    pub svg: String,
}

/// Black-box render call: `render(id, source) -> markup`.
#[async_trait::async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, id: u64, source: &str) -> Result<RenderedDiagram, RenderError>;
}

// =============================================================================
// KROKI CLIENT
// =============================================================================

pub struct KrokiRenderer {
    http: reqwest::Client,
    base_url: String,
}

impl KrokiRenderer {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(base_url: Option<&str>) -> Result<Self, RenderError> {
        let base_url = base_url
            .unwrap_or(DEFAULT_RENDERER_URL)
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RenderError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }
}

#[async_trait::async_trait]
impl DiagramRenderer for KrokiRenderer {
    async fn render(&self, id: u64, source: &str) -> Result<RenderedDiagram, RenderError> {
        let url = format!("{}/mermaid/svg", self.base_url);
        let response = self
            .http
            .post(url)
            .header("Content-Type", "text/plain")
            .body(source.to_owned())
            .send()
            .await
            .map_err(|e| RenderError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RenderError::Http(e.to_string()))?;

        // 4xx carries the renderer's syntax diagnostic; anything else is
        // treated as a service failure.
        if (400..500).contains(&status) {
            return Err(RenderError::InvalidSource(body));
        }
        if status != 200 {
            return Err(RenderError::Http(format!("HTTP {status}: {body}")));
        }

        Ok(RenderedDiagram { id, svg: body })
    }
}
