//! Router assembly.
//!
//! One flat API router: document and session state, AI operations, export,
//! and the websocket event stream the host UI drives its DOM from.

pub mod ai;
pub mod document;
pub mod events;
pub mod export;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/document", get(document::get_document).put(document::put_document))
        .route("/api/zoom", post(document::zoom))
        .route("/api/theme", get(document::get_theme).put(document::put_theme))
        .route("/api/history", get(document::history))
        .route("/api/chat/{message_id}/restore", post(document::restore))
        .route("/api/ai/generate", post(ai::generate))
        .route("/api/ai/chat", post(ai::chat))
        .route("/api/ai/apply", post(ai::apply))
        .route("/api/ai/config", get(ai::get_config).put(ai::put_config))
        .route("/api/export/{format}", get(export::export))
        .route("/api/events", get(events::events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
