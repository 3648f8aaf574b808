use super::*;
use crate::services::history;
use crate::state::test_helpers::test_app_state;

// =============================================================================
// CHUNKING
// =============================================================================

#[test]
fn newline_is_its_own_chunk() {
    let chunks = segment("a\nb");
    let classes: Vec<ChunkClass> = chunks.iter().map(|c| c.class).collect();
    assert_eq!(classes, vec![ChunkClass::Word, ChunkClass::Newline, ChunkClass::Word]);
}

#[test]
fn alphanumeric_runs_stay_together() {
    let chunks = segment("flowchart TD");
    assert_eq!(chunks[0], Chunk { text: "flowchart".into(), class: ChunkClass::Word });
    assert_eq!(chunks[1], Chunk { text: " ".into(), class: ChunkClass::Space });
    assert_eq!(chunks[2], Chunk { text: "TD".into(), class: ChunkClass::Word });
}

#[test]
fn symbols_arrive_at_most_three_at_a_time() {
    let chunks = segment("A-->|ok|B");
    let symbols: Vec<&Chunk> = chunks.iter().filter(|c| c.class == ChunkClass::Symbol).collect();
    assert!(symbols.iter().all(|c| c.text.chars().count() <= 3));
    assert_eq!(symbols[0].text, "-->");
}

#[test]
fn indentation_is_a_space_chunk() {
    let chunks = segment("    A --> B");
    assert_eq!(chunks[0], Chunk { text: "    ".into(), class: ChunkClass::Space });
}

#[test]
fn chunks_reassemble_to_the_original() {
    let code = "flowchart TD\n    A[Start] --> B{Choice}\n    B -->|yes| C\n";
    let rebuilt: String = segment(code).into_iter().map(|c| c.text).collect();
    assert_eq!(rebuilt, code);
}

#[test]
fn delays_stay_inside_their_bands() {
    for _ in 0..100 {
        let d = chunk_delay_ms(ChunkClass::Newline);
        assert!((3.0..9.0).contains(&d));
        let d = chunk_delay_ms(ChunkClass::Word);
        assert!((1.0..3.0).contains(&d));
        let d = chunk_delay_ms(ChunkClass::Space);
        assert!((0.5..1.5).contains(&d));
        let d = chunk_delay_ms(ChunkClass::Symbol);
        assert!((0.5..2.5).contains(&d));
    }
}

#[test]
fn cursor_tracks_line_and_column() {
    assert_eq!(cursor_at_end(""), CursorPos { line: 1, column: 1 });
    assert_eq!(cursor_at_end("ab"), CursorPos { line: 1, column: 3 });
    assert_eq!(cursor_at_end("ab\n"), CursorPos { line: 2, column: 1 });
    assert_eq!(cursor_at_end("ab\ncd"), CursorPos { line: 2, column: 3 });
}

// =============================================================================
// SESSION LOOP
// =============================================================================

#[tokio::test]
async fn completed_session_types_the_exact_code() {
    let state = test_app_state();
    let code = "flowchart TD\n    A --> B";
    run_typing_session(state.clone(), code.to_owned()).await;

    let session = state.session.read().await;
    assert_eq!(session.document, code);
    assert!(!session.typing_active);
}

#[tokio::test]
async fn completed_session_persists_history_and_autosave() {
    let state = test_app_state();
    let code = "graph LR\n    A --> B";
    run_typing_session(state.clone(), code.to_owned()).await;

    let entries = history::load(state.store.as_ref());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].code, code);
    assert_eq!(history::load_autosave(state.store.as_ref()).as_deref(), Some(code));
}

#[tokio::test]
async fn completed_session_attaches_snapshot_to_newest_assistant_message() {
    let state = test_app_state();
    let code = "pie\n    \"A\" : 1";
    {
        let mut session = state.session.write().await;
        session.chat.push(crate::state::ChatMessage::new(Role::User, "make a pie chart"));
        session.chat.push(crate::state::ChatMessage::new(Role::Assistant, "Here you go."));
    }
    run_typing_session(state.clone(), code.to_owned()).await;

    let session = state.session.read().await;
    assert_eq!(session.chat[1].code_snapshot.as_deref(), Some(code));
    assert!(session.chat[0].code_snapshot.is_none());
}

#[tokio::test]
async fn session_emits_document_events_and_captions() {
    let state = test_app_state();
    let mut rx = state.events.subscribe();
    run_typing_session(state.clone(), "graph TD\n    A --> B".to_owned()).await;

    let mut saw_caption = false;
    let mut saw_hide = false;
    let mut last_text = None;
    while let Ok(event) = rx.try_recv() {
        match event {
            UiEvent::Document { text, .. } => last_text = Some(text),
            UiEvent::TypingIndicator { caption: Some(_) } => saw_caption = true,
            UiEvent::TypingIndicator { caption: None } => saw_hide = true,
            UiEvent::Display { .. } | UiEvent::Notice { .. } => {}
        }
    }
    assert!(saw_caption);
    assert!(saw_hide);
    assert_eq!(last_text.as_deref(), Some("graph TD\n    A --> B"));
}

#[tokio::test]
async fn interrupt_stops_a_session_midway() {
    let state = test_app_state();
    // Enough chunks that the session cannot finish before the interrupt.
    let code = "flowchart TD\n".to_owned() + &"    A --> B\n".repeat(400);
    let handle = tokio::spawn(run_typing_session(state.clone(), code.clone()));

    tokio::time::sleep(Duration::from_millis(20)).await;
    state.typing.interrupt().await;
    handle.await.unwrap();

    let session = state.session.read().await;
    assert!(session.document.len() < code.len());
    // History is only written on completion.
    assert!(history::load(state.store.as_ref()).is_empty());
}

#[tokio::test]
async fn superseded_session_does_not_finish_behind_its_successor() {
    let state = test_app_state();
    let code_a = "graph TD\n    A --> B".to_owned();
    let a = tokio::spawn(run_typing_session(state.clone(), code_a.clone()));

    // Wait until A has typed everything and is sitting in its completion pause.
    for _ in 0..200 {
        if state.session.read().await.document == code_a {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(state.session.read().await.document, code_a);

    let code_b = "flowchart TD\n".to_owned() + &"    A --> B\n".repeat(400);
    let b = tokio::spawn(run_typing_session(state.clone(), code_b));
    a.await.unwrap();

    // B cancelled A mid-pause: A must not lower the flag or persist its code.
    assert!(state.session.read().await.typing_active);
    assert!(history::load(state.store.as_ref()).iter().all(|e| e.code != code_a));
    assert!(history::load_autosave(state.store.as_ref()).as_deref() != Some(code_a.as_str()));

    state.typing.interrupt().await;
    b.await.unwrap();
}

#[tokio::test]
async fn stale_finish_does_not_cancel_the_next_session() {
    let control = TypingControl::new();
    let (old_token, _old_rx) = control.begin().await;
    let (_new_token, new_rx) = control.begin().await;

    control.finish(old_token).await;
    control.interrupt().await;
    assert!(*new_rx.borrow());
}
