use super::*;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::render::display::Transition;
use crate::state::test_helpers::{FailingRenderer, OkRenderer, test_app_state, test_app_state_with_renderer};
use crate::state::{ChatMessage, Role};

// =============================================================================
// PREVIEW
// =============================================================================

#[tokio::test]
async fn renderable_document_publishes_a_diagram() {
    let renderer = Arc::new(OkRenderer::default());
    let state = test_app_state_with_renderer(renderer.clone());
    let mut rx = state.events.subscribe();

    set_document(&state, "flowchart TD\n    A --> B".to_owned(), None).await;

    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    assert!(state.session.read().await.rendered.is_some());
    let seen_diagram = std::iter::from_fn(|| rx.try_recv().ok()).any(|e| {
        matches!(e, UiEvent::Display { command: DisplayCommand::Diagram { update_status: true, .. } })
    });
    assert!(seen_diagram);
}

#[tokio::test]
async fn short_document_swaps_to_placeholder_without_rendering() {
    let renderer = Arc::new(OkRenderer::default());
    let state = test_app_state_with_renderer(renderer.clone());
    let mut rx = state.events.subscribe();

    set_document(&state, "graph".to_owned(), None).await;

    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    assert!(state.session.read().await.rendered.is_none());
    let seen_placeholder = std::iter::from_fn(|| rx.try_recv().ok()).any(|e| {
        matches!(
            e,
            UiEvent::Display { command: DisplayCommand::Placeholder { transition: Transition::Fade } }
        )
    });
    assert!(seen_placeholder);
}

#[tokio::test]
async fn genuine_render_error_publishes_an_error_panel() {
    let state = test_app_state_with_renderer(Arc::new(FailingRenderer {
        message: "Parse error on line 2".to_owned(),
    }));
    let mut rx = state.events.subscribe();

    set_document(&state, "flowchart TD\n    A --> B --> C --> D".to_owned(), None).await;

    assert!(state.session.read().await.rendered.is_none());
    let seen_error = std::iter::from_fn(|| rx.try_recv().ok())
        .any(|e| matches!(e, UiEvent::Display { command: DisplayCommand::ErrorPanel { .. } }));
    assert!(seen_error);
}

#[tokio::test]
async fn set_document_autosaves() {
    let state = test_app_state();
    set_document(&state, "flowchart TD\n    A --> B".to_owned(), None).await;
    assert_eq!(
        crate::services::history::load_autosave(state.store.as_ref()).as_deref(),
        Some("flowchart TD\n    A --> B")
    );
}

// =============================================================================
// RESTORE
// =============================================================================

#[tokio::test]
async fn restore_swaps_document_to_the_snapshot() {
    let state = test_app_state();
    let message_id = {
        let mut session = state.session.write().await;
        session.document = "graph LR\n    X --> Y".to_owned();
        let mut msg = ChatMessage::new(Role::Assistant, "Done.");
        msg.code_snapshot = Some("flowchart TD\n    A --> B".to_owned());
        let id = msg.id;
        session.chat.push(msg);
        id
    };

    let code = restore_checkpoint(&state, message_id).await.unwrap();
    assert_eq!(code, "flowchart TD\n    A --> B");
    assert_eq!(state.session.read().await.document, code);
}

#[tokio::test]
async fn restore_without_snapshot_fails() {
    let state = test_app_state();
    let message_id = {
        let mut session = state.session.write().await;
        let msg = ChatMessage::new(Role::User, "hello");
        let id = msg.id;
        session.chat.push(msg);
        id
    };

    let err = restore_checkpoint(&state, message_id).await.unwrap_err();
    assert!(matches!(err, EditorError::CheckpointMissing));
    assert_eq!(err.error_code(), "E_CHECKPOINT_MISSING");
}

#[tokio::test]
async fn restore_during_typing_cancels_the_session() {
    let state = test_app_state();
    let message_id = {
        let mut session = state.session.write().await;
        let mut msg = ChatMessage::new(Role::Assistant, "Done.");
        msg.code_snapshot = Some("pie\n    \"A\" : 1".to_owned());
        let id = msg.id;
        session.chat.push(msg);
        id
    };

    let long_code = "flowchart TD\n".to_owned() + &"    A --> B\n".repeat(400);
    let handle = tokio::spawn(crate::typing::run_typing_session(state.clone(), long_code));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    restore_checkpoint(&state, message_id).await.unwrap();
    handle.await.unwrap();

    let session = state.session.read().await;
    assert!(!session.typing_active);
    assert_eq!(session.document, "pie\n    \"A\" : 1");
}

#[tokio::test]
async fn restore_unknown_message_fails() {
    let state = test_app_state();
    let err = restore_checkpoint(&state, uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EditorError::CheckpointMissing));
}

// =============================================================================
// THEME
// =============================================================================

struct RecordingRenderer {
    last_source: std::sync::Mutex<String>,
}

#[async_trait::async_trait]
impl crate::render::kroki::DiagramRenderer for RecordingRenderer {
    async fn render(
        &self,
        id: u64,
        source: &str,
    ) -> Result<crate::render::kroki::RenderedDiagram, crate::render::kroki::RenderError> {
        *self.last_source.lock().unwrap() = source.to_owned();
        Ok(crate::render::kroki::RenderedDiagram { id, svg: "<svg/>".to_owned() })
    }
}

#[test]
fn default_theme_leaves_the_source_alone() {
    assert_eq!(Theme::Default.fold_into("graph TD\nA"), "graph TD\nA");
}

#[test]
fn non_default_theme_prefixes_an_init_directive() {
    assert_eq!(
        Theme::Forest.fold_into("graph TD\nA"),
        "%%{init: {\"theme\": \"forest\"}}%%\ngraph TD\nA"
    );
}

#[tokio::test]
async fn set_theme_persists_and_rerenders_with_the_directive() {
    let renderer = Arc::new(RecordingRenderer { last_source: std::sync::Mutex::new(String::new()) });
    let state = test_app_state_with_renderer(renderer.clone());
    let mut rx = state.events.subscribe();
    set_document(&state, "flowchart TD\n    A --> B".to_owned(), None).await;

    set_theme(&state, Theme::Dark).await;

    let source = renderer.last_source.lock().unwrap().clone();
    assert!(source.starts_with("%%{init: {\"theme\": \"dark\"}}%%\n"));
    assert_eq!(load_theme(state.store.as_ref()), Theme::Dark);
    let noticed = std::iter::from_fn(|| rx.try_recv().ok())
        .any(|e| matches!(e, UiEvent::Notice { level: NoticeLevel::Success, .. }));
    assert!(noticed);
}

#[test]
fn load_theme_falls_back_to_the_default() {
    let store = crate::storage::MemoryStore::new();
    assert_eq!(load_theme(&store), Theme::Default);
    store.set(THEME_KEY, "\"mauve\"");
    assert_eq!(load_theme(&store), Theme::Default);
}

// =============================================================================
// ZOOM
// =============================================================================

#[tokio::test]
async fn zoom_steps_and_clamps() {
    let state = test_app_state();
    assert!((zoom(&state, ZoomAction::In).await - 1.3).abs() < 1e-9);
    for _ in 0..10 {
        zoom(&state, ZoomAction::In).await;
    }
    assert!((state.session.read().await.zoom - ZOOM_MAX).abs() < 1e-9);

    for _ in 0..20 {
        zoom(&state, ZoomAction::Out).await;
    }
    assert!((state.session.read().await.zoom - ZOOM_MIN).abs() < 1e-9);
}

#[tokio::test]
async fn zoom_reset_returns_to_one() {
    let state = test_app_state();
    zoom(&state, ZoomAction::In).await;
    zoom(&state, ZoomAction::In).await;
    assert!((zoom(&state, ZoomAction::Reset).await - 1.0).abs() < 1e-9);
}
