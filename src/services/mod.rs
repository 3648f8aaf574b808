//! Application services — the operations behind the HTTP surface.

pub mod ai;
pub mod editor;
pub mod export;
pub mod history;
