//! Git diff parsing into a structured, renderable model
//!
//! Turns raw `git diff` text into per-file sequences of typed lines with
//! independent old/new line numbers, suitable both for rendering and as
//! input to the review engine.

mod parser;
mod types;

pub use parser::{destination_path, parse_diff};
pub use types::{DiffLine, FileDiff, LineKind};
