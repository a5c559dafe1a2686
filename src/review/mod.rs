//! AI-assisted review of parsed diffs under a token budget
//!
//! Two analysis paths share the completion client but fail differently:
//! the batched [`engine`] substitutes per-file placeholder results so a
//! review always completes, while the single-prompt [`validate`] loop
//! retries with explicit feedback and returns a partial-result object when
//! its attempt budget runs out. Both shapes are part of the public API and
//! callers branch on them.

mod chunker;
mod client;
mod engine;
mod language;
mod prompt;
mod types;
mod validate;

pub use chunker::{build_batches, chunk_group, estimate_tokens, group_by_language};
pub use client::{CompletionClient, GeminiClient};
pub use engine::{summarize, ReviewEngine};
pub use language::{guidelines_for_language, language_for_extension};
pub use prompt::{batch_prompt, retry_prompt};
pub use types::{
    AnalysisOutcome, Issue, IssueCount, ReviewBatch, ReviewReport, ReviewResult, ReviewSummary,
    Severity, TopIssue,
};
pub use validate::{extract_json_object, missing_fields, validate_analysis};
