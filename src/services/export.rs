//! Diagram export.
//!
//! DESIGN
//! ======
//! Every format works from the last successful render; exporting with
//! nothing rendered is a precondition failure, not a silent empty file.
//! SVG, HTML, Markdown, and XML are pure text assembly. PNG and PDF go
//! through the optional [`Rasterizer`] capability; without one configured
//! they fail with a distinct error the routes map to 501.

use async_trait::async_trait;
use thiserror::Error;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ErrorCode;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing has been rendered yet; render a diagram before exporting")]
    NothingRendered,
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
    #[error("PNG and PDF export need a raster backend, and none is configured")]
    RasterizerUnavailable,
    #[error("raster conversion failed: {0}")]
    Raster(String),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NothingRendered => "E_EXPORT_PRECONDITION",
            Self::UnknownFormat(_) => "E_EXPORT_FORMAT",
            Self::RasterizerUnavailable => "E_RASTER_UNAVAILABLE",
            Self::Raster(_) => "E_RASTER",
        }
    }
}

// =============================================================================
// FORMATS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Pdf,
    Html,
    Markdown,
    Xml,
}

impl ExportFormat {
    /// Parse a URL path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownFormat`] for unrecognized names.
    pub fn parse(raw: &str) -> Result<Self, ExportError> {
        match raw.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "xml" => Ok(Self::Xml),
            other => Err(ExportError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Raster output kinds a [`Rasterizer`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Pdf,
}

/// Optional SVG-to-raster capability. The default deployment carries none.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, svg: &str, format: RasterFormat) -> Result<Vec<u8>, ExportError>;
}

/// A finished export, ready to stream back.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// =============================================================================
// EXPORT
// =============================================================================

/// Export the last rendered diagram in the requested format.
///
/// # Errors
///
/// Returns [`ExportError::NothingRendered`] when no render has succeeded,
/// and [`ExportError::RasterizerUnavailable`] for PNG/PDF without a raster
/// backend.
pub async fn export(state: &AppState, format: ExportFormat) -> Result<ExportFile, ExportError> {
    let (code, svg) = {
        let session = state.session.read().await;
        let rendered = session.rendered.as_ref().ok_or(ExportError::NothingRendered)?;
        (session.document.clone(), rendered.svg.clone())
    };

    let file = match format {
        ExportFormat::Svg => ExportFile {
            filename: "diagram.svg".to_owned(),
            content_type: "image/svg+xml",
            bytes: svg.into_bytes(),
        },
        ExportFormat::Html => ExportFile {
            filename: "diagram.html".to_owned(),
            content_type: "text/html; charset=utf-8",
            bytes: html_document(&code, &svg).into_bytes(),
        },
        ExportFormat::Markdown => ExportFile {
            filename: "diagram.md".to_owned(),
            content_type: "text/markdown; charset=utf-8",
            bytes: markdown_document(&code).into_bytes(),
        },
        ExportFormat::Xml => ExportFile {
            filename: "diagram.xml".to_owned(),
            content_type: "application/xml",
            bytes: xml_document(&code, &svg).into_bytes(),
        },
        ExportFormat::Png | ExportFormat::Pdf => {
            let rasterizer = state.rasterizer.as_ref().ok_or(ExportError::RasterizerUnavailable)?;
            let (raster, filename, content_type) = match format {
                ExportFormat::Png => (RasterFormat::Png, "diagram.png", "image/png"),
                _ => (RasterFormat::Pdf, "diagram.pdf", "application/pdf"),
            };
            let bytes = rasterizer.rasterize(&svg, raster).await?;
            ExportFile { filename: filename.to_owned(), content_type, bytes }
        }
    };
    Ok(file)
}

// =============================================================================
// TEMPLATES
// =============================================================================

fn html_document(code: &str, svg: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Mermaid Diagram</title>\n\
         <style>body {{ margin: 2rem; font-family: sans-serif; }} figure {{ margin: 0; }}</style>\n\
         </head>\n<body>\n<figure>\n{svg}\n</figure>\n\
         <details>\n<summary>Diagram source</summary>\n<pre><code>{}</code></pre>\n</details>\n\
         </body>\n</html>\n",
        escape_html(code)
    )
}

fn markdown_document(code: &str) -> String {
    format!("# Mermaid Diagram\n\n```mermaid\n{code}\n```\n")
}

fn xml_document(code: &str, svg: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<diagram exported-at=\"{}\">\n\
         <source><![CDATA[{}]]></source>\n<svg><![CDATA[{}]]></svg>\n</diagram>\n",
        export_timestamp(),
        escape_cdata(code),
        escape_cdata(svg)
    )
}

fn export_timestamp() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A literal `]]>` would terminate the CDATA section early; split it across
/// two sections.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
