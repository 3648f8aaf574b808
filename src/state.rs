//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! editor session (document text, typing flag, zoom, chat scrollback, last
//! rendered markup) lives behind one `RwLock`; the render pipeline has its
//! own mutex because it is the exclusive writer of render lifecycle state.
//! External collaborators (renderer, LLM, key-value store, rasterizer) are
//! trait objects so tests run against fakes.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock, broadcast};
use uuid::Uuid;

use crate::events::UiEvent;
use crate::llm::GenerateText;
use crate::render::RenderPipeline;
use crate::render::kroki::{DiagramRenderer, RenderedDiagram};
use crate::services::export::Rasterizer;
use crate::storage::KvStore;
use crate::typing::TypingControl;

/// Current time as milliseconds since Unix epoch.
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// SESSION TYPES
// =============================================================================

pub const ZOOM_STEP: f64 = 0.3;
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;

/// Mermaid color theme, applied at render time via an init directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Forest,
    Neutral,
    Base,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Forest => "forest",
            Self::Neutral => "neutral",
            Self::Base => "base",
        }
    }

    /// Prefix the diagram source with the theme's init directive. The default
    /// theme leaves the source untouched.
    #[must_use]
    pub fn fold_into(self, source: &str) -> String {
        match self {
            Self::Default => source.to_owned(),
            other => format!("%%{{init: {{\"theme\": \"{}\"}}}}%%\n{source}", other.as_str()),
        }
    }
}

/// 1-based editor cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPos {
    pub line: usize,
    pub column: usize,
}

impl Default for CursorPos {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the chat scrollback. Assistant messages may carry a single
/// restorable code snapshot (checkpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snapshot: Option<String>,
    pub ts: i64,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), role, content: content.into(), code_snapshot: None, ts: now_ms() }
    }
}

/// Mutable per-session editor state. Single instance per process.
pub struct EditorSession {
    /// Current diagram source.
    pub document: String,
    pub cursor: CursorPos,
    /// Set for the duration of a typing session; read by the render
    /// pipeline to suppress flicker and errors.
    pub typing_active: bool,
    pub zoom: f64,
    pub theme: Theme,
    /// Append-only chat scrollback.
    pub chat: Vec<ChatMessage>,
    /// Markup of the most recent successful render, if any.
    pub rendered: Option<RenderedDiagram>,
}

impl EditorSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: String::new(),
            cursor: CursorPos::default(),
            typing_active: false,
            zoom: 1.0,
            theme: Theme::default(),
            chat: Vec::new(),
            rendered: None,
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<EditorSession>>,
    pub pipeline: Arc<Mutex<RenderPipeline>>,
    pub renderer: Arc<dyn DiagramRenderer>,
    pub llm: Arc<dyn GenerateText>,
    pub store: Arc<dyn KvStore>,
    /// Optional raster backend for PNG/PDF export. `None` in the default
    /// deployment; raster exports report a clear error instead.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,
    pub typing: TypingControl,
    pub events: broadcast::Sender<UiEvent>,
}

impl AppState {
    #[must_use]
    pub fn new(renderer: Arc<dyn DiagramRenderer>, llm: Arc<dyn GenerateText>, store: Arc<dyn KvStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(EditorSession::new())),
            pipeline: Arc::new(Mutex::new(RenderPipeline::default())),
            renderer,
            llm,
            store,
            rasterizer: None,
            typing: TypingControl::new(),
            events: crate::events::channel(),
        }
    }

    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
