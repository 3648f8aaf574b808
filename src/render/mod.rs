//! Render pipeline — document text in, display commands out.
//!
//! DESIGN
//! ======
//! Every document change is evaluated against the incomplete-input heuristic
//! and, when renderable, issued to the external renderer under a fresh
//! monotonically increasing id. Ids are never reused, and only the outcome
//! of the most recently issued id may touch the display: a stale render
//! resolving late is discarded, preserving latest-write-wins ordering
//! without any cancellation machinery.
//!
//! While a typing session is active the pipeline suppresses all noise:
//! incomplete input leaves the display untouched, successes swap via a fade,
//! and failures are never surfaced.

pub mod display;
pub mod kroki;
pub mod readiness;

use tracing::debug;

use display::{DisplayCommand, Transition};
use kroki::RenderError;

// =============================================================================
// POLICY
// =============================================================================

/// Tunable noise-reduction knobs for live typing.
///
/// The error-surface threshold and signature list only reduce spurious error
/// panels on half-typed input; they carry no semantic intent beyond that.
#[derive(Debug, Clone)]
pub struct RenderPolicy {
    /// Trimmed input shorter than this is skipped outright.
    pub min_renderable_len: usize,
    /// Errors on trimmed input at or below this length are suppressed.
    pub error_surface_min_len: usize,
    /// Error-message substrings that indicate likely-incomplete input.
    pub spurious_error_signatures: Vec<String>,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            min_renderable_len: 10,
            error_surface_min_len: 30,
            spurious_error_signatures: vec![
                "Unrecognized text".to_owned(),
                "No diagram type detected".to_owned(),
            ],
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Exclusive single-writer render lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering,
    Success,
    Error,
}

/// Outcome of evaluating a document change before any renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Input is incomplete; optionally swap to the placeholder.
    Skip(Option<DisplayCommand>),
    /// Issue a render under this id.
    Render { id: u64 },
}

pub struct RenderPipeline {
    policy: RenderPolicy,
    next_id: u64,
    latest_issued: u64,
    state: RenderState,
}

impl RenderPipeline {
    #[must_use]
    pub fn new(policy: RenderPolicy) -> Self {
        Self { policy, next_id: 0, latest_issued: 0, state: RenderState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Classify a document change. Renderable input claims a fresh id and
    /// records it as the latest issued request.
    pub fn evaluate(&mut self, text: &str, typing: bool) -> Evaluation {
        if readiness::is_incomplete(text, self.policy.min_renderable_len) {
            // During a typing session the current display stays untouched;
            // otherwise fall back to the placeholder with a fade.
            let command = if typing {
                None
            } else {
                Some(DisplayCommand::Placeholder { transition: Transition::Fade })
            };
            return Evaluation::Skip(command);
        }

        self.next_id += 1;
        self.latest_issued = self.next_id;
        self.state = RenderState::Rendering;
        Evaluation::Render { id: self.next_id }
    }

    /// Fold a render completion back into the pipeline.
    ///
    /// Returns the display command to execute, or `None` when the outcome is
    /// stale or suppressed. `typing` must be re-read after the renderer call
    /// resolves; the flag can flip while the call is in flight.
    pub fn complete(
        &mut self,
        id: u64,
        outcome: Result<String, RenderError>,
        text: &str,
        typing: bool,
    ) -> Option<DisplayCommand> {
        if id != self.latest_issued {
            debug!(id, latest = self.latest_issued, "render: discarding stale completion");
            return None;
        }

        match outcome {
            Ok(markup) => {
                self.state = RenderState::Success;
                let transition = if typing { Transition::Fade } else { Transition::Immediate };
                Some(DisplayCommand::Diagram {
                    markup,
                    transition,
                    reapply_zoom: true,
                    update_status: !typing,
                })
            }
            Err(err) => {
                self.state = RenderState::Error;
                if typing || !self.should_surface_error(text, &err) {
                    debug!(id, error = %err, "render: error suppressed");
                    return None;
                }
                Some(DisplayCommand::ErrorPanel { message: err.to_string() })
            }
        }
    }

    /// Errors on short input, or matching a likely-incomplete signature,
    /// are noise from normal keystroke-by-keystroke editing.
    fn should_surface_error(&self, text: &str, err: &RenderError) -> bool {
        if text.trim().len() <= self.policy.error_surface_min_len {
            return false;
        }
        let message = err.to_string();
        !self
            .policy
            .spurious_error_signatures
            .iter()
            .any(|sig| message.contains(sig.as_str()))
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RenderPolicy::default())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
