mod error;
mod events;
mod llm;
mod render;
mod routes;
mod services;
mod state;
mod storage;
mod typing;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");
    let data_dir = std::env::var("STUDIO_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let renderer_url = std::env::var("RENDERER_URL").ok();

    let store = storage::FileStore::new(&data_dir).expect("data directory init failed");
    let renderer =
        render::kroki::KrokiRenderer::new(renderer_url.as_deref()).expect("renderer client init failed");
    let llm = llm::ProviderClient::new().expect("LLM client init failed");

    let state = state::AppState::new(Arc::new(renderer), Arc::new(llm), Arc::new(store));

    // Bring back the saved theme and the last autosaved document, if any.
    state.session.write().await.theme = services::editor::load_theme(state.store.as_ref());
    if let Some(code) = services::history::load_autosave(state.store.as_ref()) {
        state.session.write().await.document = code;
        tokio::spawn(services::editor::refresh_preview(state.clone()));
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %data_dir, "mermaid studio listening");
    axum::serve(listener, app).await.expect("server failed");
}
