//! AI routes — generation, chat, apply, and provider configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::error_body;
use crate::llm::config::{ProviderConfig, ProviderKind};
use crate::llm::types::LlmError;
use crate::services::ai;
use crate::state::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// A bad config is the caller's problem; everything past it is the
/// provider's.
fn llm_status(err: &LlmError) -> StatusCode {
    match err {
        LlmError::ConfigMissing { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

/// `POST /api/ai/generate` — generate a diagram, type it into the editor,
/// and return the cleaned code.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let code = ai::submit_prompt(&state, body.prompt)
        .await
        .map_err(|e| error_body(llm_status(&e), &e))?;
    Ok(Json(serde_json::json!({ "code": code })))
}

#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
}

/// `POST /api/ai/chat` — send a chat message; returns the assistant reply
/// and, when the reply carried a diagram, the extracted code.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (reply, code) = ai::send_chat_message(&state, body.message)
        .await
        .map_err(|e| error_body(llm_status(&e), &e))?;
    Ok(Json(serde_json::json!({ "reply": reply, "code": code })))
}

#[derive(Deserialize)]
pub struct ApplyBody {
    pub code: String,
}

/// `POST /api/ai/apply` — commit generated code straight into the editor.
pub async fn apply(
    State(state): State<AppState>,
    Json(body): Json<ApplyBody>,
) -> Json<serde_json::Value> {
    ai::apply_generated_code(&state, body.code).await;
    Json(serde_json::json!({ "ok": true }))
}

/// Provider config as returned to clients: the key itself never leaves the
/// store, only whether one is set.
#[derive(Serialize)]
pub struct ConfigView {
    pub provider: ProviderKind,
    pub model: String,
    pub custom_endpoint: Option<String>,
    pub api_key_set: bool,
}

/// `GET /api/ai/config` — the saved provider configuration, key redacted.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigView> {
    let config = ProviderConfig::load(state.store.as_ref());
    Json(ConfigView {
        provider: config.provider,
        model: config.model,
        custom_endpoint: config.custom_endpoint,
        api_key_set: !config.api_key.trim().is_empty(),
    })
}

/// `PUT /api/ai/config` — validate and persist a provider configuration.
pub async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<ProviderConfig>,
) -> Result<Json<serde_json::Value>, ApiError> {
    config
        .validate()
        .map_err(|e| error_body(StatusCode::BAD_REQUEST, &e))?;
    config.save(state.store.as_ref());
    Ok(Json(serde_json::json!({ "ok": true })))
}
