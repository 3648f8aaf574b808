//! UI event stream — how the core tells the host UI what to show.
//!
//! DESIGN
//! ======
//! Business logic never touches a DOM. It emits [`UiEvent`] values on a
//! broadcast channel; the events websocket forwards them as JSON and the
//! host executes them (swap the preview, move the cursor, flash a notice).
//! Publishing with no connected host is a no-op, not an error.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::render::display::DisplayCommand;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    /// Full document replacement plus cursor position (1-based).
    Document {
        text: String,
        cursor_line: usize,
        cursor_column: usize,
    },

    /// Preview display command (placeholder / diagram / error panel).
    Display { command: DisplayCommand },

    /// Floating typing-indicator caption. `None` hides the indicator.
    TypingIndicator { caption: Option<String> },

    /// Transient toast-style notification.
    Notice { level: NoticeLevel, message: String },
}

#[must_use]
pub fn channel() -> broadcast::Sender<UiEvent> {
    broadcast::channel(EVENT_CHANNEL_CAPACITY).0
}

/// Send an event, ignoring the no-subscriber case.
pub fn publish(tx: &broadcast::Sender<UiEvent>, event: UiEvent) {
    let _ = tx.send(event);
}
