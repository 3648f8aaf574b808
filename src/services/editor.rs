//! Editor operations — document edits, preview refresh, zoom, restore.
//!
//! DESIGN
//! ======
//! `refresh_preview` is the single render driver: it evaluates the current
//! document against the pipeline, calls the renderer when warranted, and
//! publishes the resulting display command. It is spawned fire-and-forget
//! from the typing loop (so overlapping completions exercise the stale-id
//! discard) and awaited from request handlers.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::history;
use crate::error::ErrorCode;
use crate::events::{self, NoticeLevel, UiEvent};
use crate::render::Evaluation;
use crate::render::display::DisplayCommand;
use crate::state::{AppState, CursorPos, Theme, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::storage::KvStore;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no checkpoint is attached to that message")]
    CheckpointMissing,
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CheckpointMissing => "E_CHECKPOINT_MISSING",
        }
    }
}

// =============================================================================
// PREVIEW
// =============================================================================

/// Evaluate the current document and, when warranted, render it and publish
/// the display command. Stale completions and suppressed errors publish
/// nothing.
pub async fn refresh_preview(state: AppState) {
    let (text, typing, theme) = {
        let session = state.session.read().await;
        (session.document.clone(), session.typing_active, session.theme)
    };

    let evaluation = state.pipeline.lock().await.evaluate(&text, typing);
    match evaluation {
        Evaluation::Skip(None) => {}
        Evaluation::Skip(Some(command)) => {
            state.session.write().await.rendered = None;
            events::publish(&state.events, UiEvent::Display { command });
        }
        Evaluation::Render { id } => {
            let outcome = state.renderer.render(id, &theme.fold_into(&text)).await;
            let rendered = outcome.as_ref().ok().cloned();
            // Re-read the typing flag: it can flip while the render is in
            // flight, and completion behavior depends on the value now.
            let typing_now = state.session.read().await.typing_active;
            let command = state
                .pipeline
                .lock()
                .await
                .complete(id, outcome.map(|d| d.svg), &text, typing_now);
            if let Some(command) = command {
                if matches!(command, DisplayCommand::Diagram { .. }) {
                    state.session.write().await.rendered = rendered;
                }
                events::publish(&state.events, UiEvent::Display { command });
            }
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Replace the document from a manual edit. Interrupts any typing session,
/// autosaves, and refreshes the preview.
pub async fn set_document(state: &AppState, text: String, cursor: Option<CursorPos>) {
    state.typing.interrupt().await;
    {
        let mut session = state.session.write().await;
        session.typing_active = false;
        session.document = text.clone();
        if let Some(cursor) = cursor {
            session.cursor = cursor;
        }
    }
    history::autosave(state.store.as_ref(), &text);
    refresh_preview(state.clone()).await;
}

/// Restore the code snapshot attached to a chat message, replacing the
/// document instantly (no typing replay).
pub async fn restore_checkpoint(state: &AppState, message_id: Uuid) -> Result<String, EditorError> {
    state.typing.interrupt().await;

    let code = {
        let mut session = state.session.write().await;
        let code = session
            .chat
            .iter()
            .find(|m| m.id == message_id)
            .and_then(|m| m.code_snapshot.clone())
            .ok_or(EditorError::CheckpointMissing)?;
        session.typing_active = false;
        session.document = code.clone();
        code
    };

    info!(%message_id, "editor: restored checkpoint");
    events::publish(&state.events, UiEvent::Document {
        text: code.clone(),
        cursor_line: 1,
        cursor_column: 1,
    });
    events::publish(&state.events, UiEvent::Notice {
        level: NoticeLevel::Success,
        message: "Code restored from checkpoint".to_owned(),
    });
    history::autosave(state.store.as_ref(), &code);
    refresh_preview(state.clone()).await;
    Ok(code)
}

// =============================================================================
// THEME
// =============================================================================

pub const THEME_KEY: &str = "theme";

/// Saved theme, or the default when nothing (or garbage) is stored.
pub fn load_theme(store: &dyn KvStore) -> Theme {
    store
        .get(THEME_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Switch the render theme, persist it, and re-render the current document.
pub async fn set_theme(state: &AppState, theme: Theme) {
    state.session.write().await.theme = theme;
    if let Ok(raw) = serde_json::to_string(&theme) {
        state.store.set(THEME_KEY, &raw);
    }
    info!(theme = theme.as_str(), "editor: theme changed");
    events::publish(&state.events, UiEvent::Notice {
        level: NoticeLevel::Success,
        message: format!("Switched to the {} theme", theme.as_str()),
    });
    refresh_preview(state.clone()).await;
}

// =============================================================================
// ZOOM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// Apply a zoom action and return the new factor.
pub async fn zoom(state: &AppState, action: ZoomAction) -> f64 {
    let mut session = state.session.write().await;
    session.zoom = match action {
        ZoomAction::In => (session.zoom + ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX),
        ZoomAction::Out => (session.zoom - ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX),
        ZoomAction::Reset => 1.0,
    };
    session.zoom
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
