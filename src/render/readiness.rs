//! Incomplete-input heuristic.
//!
//! During live authorship (human or simulated) the document passes through
//! many states that are obviously not renderable. Those are skipped without
//! ever touching the renderer.

/// True when `text` is too short or visibly mid-edit to be worth rendering.
///
/// A trailing unmatched opener (`[`, `(`, `"`) is the strongest signal: the
/// author is inside a node label or string literal.
#[must_use]
pub fn is_incomplete(text: &str, min_len: usize) -> bool {
    let trimmed = text.trim();
    trimmed.len() < min_len
        || trimmed.ends_with('[')
        || trimmed.ends_with('(')
        || trimmed.ends_with('"')
}
