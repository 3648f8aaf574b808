//! Simulated AI typing sessions.
//!
//! DESIGN
//! ======
//! Generated code is replayed into the editor chunk by chunk so the user
//! watches it being written. Chunking follows character class: a newline is
//! its own chunk, alphanumeric and whitespace runs land as bursts, and
//! symbols arrive at most three at a time. Each class carries its own delay
//! band; sub-millisecond delays degrade to a scheduler yield so long
//! documents still finish quickly.
//!
//! At most one session runs at a time. `TypingControl` hands each session a
//! watch-channel receiver that is polled at every chunk boundary; starting a
//! new session or interrupting (restore, manual edit) flips it and the old
//! session stops without touching shared flags the interrupter now owns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::events::{self, UiEvent};
use crate::state::{AppState, CursorPos, Role};

// =============================================================================
// SESSION CONTROL
// =============================================================================

#[derive(Clone)]
pub struct TypingControl {
    inner: Arc<Mutex<Active>>,
}

#[derive(Default)]
struct Active {
    seq: u64,
    session: Option<(u64, watch::Sender<bool>)>,
}

impl TypingControl {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Active::default())) }
    }

    /// Start a session, interrupting any session in flight. Returns the
    /// session token and the cancellation receiver the session polls at
    /// chunk boundaries.
    pub async fn begin(&self) -> (u64, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        let mut guard = self.inner.lock().await;
        guard.seq += 1;
        let token = guard.seq;
        if let Some((_, prev)) = guard.session.replace((token, tx)) {
            let _ = prev.send(true);
        }
        (token, rx)
    }

    /// Interrupt the session in flight, if any.
    pub async fn interrupt(&self) {
        if let Some((_, tx)) = self.inner.lock().await.session.take() {
            let _ = tx.send(true);
        }
    }

    /// Retire a finished session. A stale token is a no-op, so a session
    /// completing late cannot cancel its successor.
    pub async fn finish(&self, token: u64) {
        let mut guard = self.inner.lock().await;
        if guard.session.as_ref().is_some_and(|(t, _)| *t == token) {
            guard.session = None;
        }
    }
}

impl Default for TypingControl {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CHUNKING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkClass {
    Newline,
    Word,
    Space,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub class: ChunkClass,
}

const MAX_SYMBOL_RUN: usize = 3;

/// Split text into typing chunks by character class.
#[must_use]
pub fn segment(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c == '\n' {
            chars.next();
            chunks.push(Chunk { text: "\n".to_owned(), class: ChunkClass::Newline });
        } else if c.is_alphanumeric() {
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if !c.is_alphanumeric() {
                    break;
                }
                run.push(c);
                chars.next();
            }
            chunks.push(Chunk { text: run, class: ChunkClass::Word });
        } else if c.is_whitespace() {
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if c == '\n' || !c.is_whitespace() {
                    break;
                }
                run.push(c);
                chars.next();
            }
            chunks.push(Chunk { text: run, class: ChunkClass::Space });
        } else {
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if run.chars().count() == MAX_SYMBOL_RUN || c == '\n' || c.is_alphanumeric() || c.is_whitespace() {
                    break;
                }
                run.push(c);
                chars.next();
            }
            chunks.push(Chunk { text: run, class: ChunkClass::Symbol });
        }
    }

    chunks
}

/// Sample a delay for one chunk, in milliseconds.
///
/// Contained in a sync fn: `ThreadRng` is not `Send` and must not live
/// across an await point.
#[must_use]
pub fn chunk_delay_ms(class: ChunkClass) -> f64 {
    use rand::Rng as _;
    let mut rng = rand::rng();
    match class {
        ChunkClass::Newline => rng.random_range(3.0..9.0),
        ChunkClass::Word => rng.random_range(1.0..3.0),
        ChunkClass::Space => rng.random_range(0.5..1.5),
        ChunkClass::Symbol => rng.random_range(0.5..2.5),
    }
}

async fn pace(ms: f64) {
    if ms < 1.0 {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(Duration::from_secs_f64(ms / 1000.0)).await;
    }
}

// =============================================================================
// SESSION LOOP
// =============================================================================

/// Progress captions, surfaced evenly across the session.
pub const TYPING_CAPTIONS: [&str; 5] = [
    "Analyzing the request...",
    "Drafting the diagram structure...",
    "Tidying code formatting...",
    "Refining details...",
    "Almost done...",
];

const COMPLETION_CAPTION: &str = "Code written!";
const COMPLETION_PAUSE_MS: u64 = 800;

/// Replay `code` into the editor as a typing session.
///
/// On completion the session persists the result to history and autosave,
/// attaches the code as a restorable snapshot to the newest assistant chat
/// message still missing one, and kicks a final status-updating render.
/// On interruption it returns without touching session flags; the
/// interrupter owns them.
pub async fn run_typing_session(state: AppState, code: String) {
    let (token, cancel) = state.typing.begin().await;

    {
        let mut session = state.session.write().await;
        session.typing_active = true;
        session.document.clear();
        session.cursor = CursorPos::default();
    }
    publish_document(&state, "", CursorPos::default());

    let chunks = segment(&code);
    let total = chunks.len().max(1);
    let mut next_caption = 0;

    for (i, chunk) in chunks.iter().enumerate() {
        if *cancel.borrow() {
            debug!(token, typed = i, "typing: session interrupted");
            return;
        }

        if next_caption < TYPING_CAPTIONS.len() && i * TYPING_CAPTIONS.len() >= next_caption * total {
            events::publish(&state.events, UiEvent::TypingIndicator {
                caption: Some(TYPING_CAPTIONS[next_caption].to_owned()),
            });
            next_caption += 1;
        }

        let (text, cursor) = {
            let mut session = state.session.write().await;
            // Re-check under the lock: an interrupter that already rewrote
            // the document must not get a chunk appended behind it.
            if *cancel.borrow() {
                debug!(token, typed = i, "typing: session interrupted");
                return;
            }
            session.document.push_str(&chunk.text);
            session.cursor = cursor_at_end(&session.document);
            (session.document.clone(), session.cursor)
        };
        publish_document(&state, &text, cursor);
        tokio::spawn(crate::services::editor::refresh_preview(state.clone()));

        pace(chunk_delay_ms(chunk.class)).await;
    }

    if *cancel.borrow() {
        debug!(token, "typing: session interrupted before completion");
        return;
    }

    events::publish(&state.events, UiEvent::TypingIndicator {
        caption: Some(COMPLETION_CAPTION.to_owned()),
    });
    tokio::time::sleep(Duration::from_millis(COMPLETION_PAUSE_MS)).await;

    {
        let mut session = state.session.write().await;
        // A successor may have started during the completion pause; the
        // typing flag, snapshot slot, and persistence now belong to it.
        if *cancel.borrow() {
            debug!(token, "typing: session superseded during completion pause");
            return;
        }
        session.typing_active = false;
        if let Some(message) = session
            .chat
            .iter_mut()
            .rev()
            .find(|m| matches!(m.role, Role::Assistant) && m.code_snapshot.is_none())
        {
            message.code_snapshot = Some(code.clone());
        }
        crate::services::history::record(state.store.as_ref(), &code);
        crate::services::history::autosave(state.store.as_ref(), &code);
    }
    state.typing.finish(token).await;

    events::publish(&state.events, UiEvent::TypingIndicator { caption: None });
    // Final render now that the typing flag is down, so the status line
    // updates and any suppressed error can surface.
    tokio::spawn(crate::services::editor::refresh_preview(state));
}

fn cursor_at_end(text: &str) -> CursorPos {
    let line = text.matches('\n').count() + 1;
    let column = text.rsplit('\n').next().unwrap_or("").chars().count() + 1;
    CursorPos { line, column }
}

fn publish_document(state: &AppState, text: &str, cursor: CursorPos) {
    events::publish(&state.events, UiEvent::Document {
        text: text.to_owned(),
        cursor_line: cursor.line,
        cursor_column: cursor.column,
    });
}

#[cfg(test)]
#[path = "typing_test.rs"]
mod tests;
