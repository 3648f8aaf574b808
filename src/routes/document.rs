//! Document, zoom, theme, history, and checkpoint-restore routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::error_body;
use crate::services::editor::{self, EditorError, ZoomAction};
use crate::services::history;
use crate::state::{AppState, ChatMessage, CursorPos, Theme};

type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Serialize)]
pub struct DocumentResponse {
    pub text: String,
    pub cursor: CursorPos,
    pub zoom: f64,
    pub typing_active: bool,
    pub chat: Vec<ChatMessage>,
}

/// `GET /api/document` — full session view.
pub async fn get_document(State(state): State<AppState>) -> Json<DocumentResponse> {
    let session = state.session.read().await;
    Json(DocumentResponse {
        text: session.document.clone(),
        cursor: session.cursor,
        zoom: session.zoom,
        typing_active: session.typing_active,
        chat: session.chat.clone(),
    })
}

#[derive(Deserialize)]
pub struct PutDocumentBody {
    pub text: String,
    pub cursor: Option<CursorPos>,
}

/// `PUT /api/document` — manual edit. Interrupts typing and refreshes the
/// preview.
pub async fn put_document(
    State(state): State<AppState>,
    Json(body): Json<PutDocumentBody>,
) -> Json<serde_json::Value> {
    editor::set_document(&state, body.text, body.cursor).await;
    Json(serde_json::json!({ "ok": true }))
}

#[derive(Deserialize)]
pub struct ZoomBody {
    pub action: ZoomAction,
}

/// `POST /api/zoom` — step or reset the preview zoom.
pub async fn zoom(State(state): State<AppState>, Json(body): Json<ZoomBody>) -> Json<serde_json::Value> {
    let zoom = editor::zoom(&state, body.action).await;
    Json(serde_json::json!({ "zoom": zoom }))
}

#[derive(Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// `GET /api/theme` — current render theme.
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody { theme: state.session.read().await.theme })
}

/// `PUT /api/theme` — switch the render theme and re-render.
pub async fn put_theme(State(state): State<AppState>, Json(body): Json<ThemeBody>) -> Json<ThemeBody> {
    editor::set_theme(&state, body.theme).await;
    Json(ThemeBody { theme: body.theme })
}

/// `GET /api/history` — saved diagram versions, newest first.
pub async fn history(State(state): State<AppState>) -> Json<Vec<history::HistoryEntry>> {
    Json(history::load(state.store.as_ref()))
}

/// `POST /api/chat/:message_id/restore` — restore a chat checkpoint.
pub async fn restore(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let code = editor::restore_checkpoint(&state, message_id)
        .await
        .map_err(|e| match e {
            EditorError::CheckpointMissing => error_body(StatusCode::NOT_FOUND, &e),
        })?;
    Ok(Json(serde_json::json!({ "ok": true, "text": code })))
}
