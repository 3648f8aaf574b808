//! Display commands — pure "what to show" values.
//!
//! The pipeline decides, the host UI executes. Keeping these as plain data
//! lets the suppression rules be unit tested without any DOM.

use serde::Serialize;

/// How a swap of the preview content should be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// Replace content directly.
    Immediate,
    /// Dim to partial opacity, wait [`FADE_SWAP_DELAY_MS`], swap, restore.
    Fade,
}

/// Delay between the dim phase and the content swap of a fade transition.
pub const FADE_SWAP_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayCommand {
    /// Swap to the neutral "enter some code" placeholder.
    Placeholder { transition: Transition },

    /// Swap in freshly rendered diagram markup.
    Diagram {
        markup: String,
        transition: Transition,
        /// Reapply the session zoom factor after the swap.
        reapply_zoom: bool,
        /// Update the success indicator. Suppressed during typing sessions.
        update_status: bool,
    },

    /// Show the error panel with the renderer's message.
    ErrorPanel { message: String },
}
