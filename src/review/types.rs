//! Type definitions for AI review results and batching

use crate::diff::FileDiff;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-level issue classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Lenient parse used on model output; anything unrecognized is
    /// downgraded to low rather than rejected.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// A single issue reported for a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Per-file review output. Exactly one of these exists for every file
/// submitted, whatever the model returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
}

impl ReviewResult {
    /// Placeholder for a file the model's response did not mention.
    pub fn not_mentioned(path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
            issues: Vec::new(),
            suggestions: vec!["No specific issues found.".to_string()],
        }
    }

    /// Placeholder emitted when the batch's AI call or response parse failed.
    pub fn analysis_failed(path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
            issues: vec![Issue {
                title: "Analysis failed".to_string(),
                description: "The AI analysis for this file did not complete.".to_string(),
                severity: Severity::Low,
                line: None,
            }],
            suggestions: vec!["File could not be analyzed due to an error.".to_string()],
        }
    }
}

/// Issue counts by severity plus total
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueCount {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

/// A high-severity issue surfaced in the summary, annotated with its file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopIssue {
    pub file: String,
    pub title: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Aggregate over all per-file results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub files_analyzed: usize,
    pub issue_count: IssueCount,
    pub overall_quality: String,
    pub top_issues: Vec<TopIssue>,
    pub generated_at: DateTime<Utc>,
}

/// The JSON-serializable shape returned across the HTTP boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    pub summary: ReviewSummary,
    pub files: Vec<ReviewResult>,
}

/// A token-budget-bounded group of same-language files submitted together
/// in one AI completion request.
#[derive(Debug, Clone)]
pub struct ReviewBatch {
    pub language: String,
    pub files: Vec<FileDiff>,
    pub estimated_tokens: usize,
}

/// Outcome of the single-prompt analysis path.
///
/// `Partial` is a successful-but-degraded result, not an error: the caller
/// renders it as a partial analysis rather than a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    #[serde(rename_all = "camelCase")]
    Partial {
        partial: bool,
        missing_fields: Vec<String>,
        message: String,
    },
    Complete(serde_json::Value),
}

impl AnalysisOutcome {
    pub fn partial(missing_fields: Vec<String>) -> Self {
        let message = format!(
            "Analysis incomplete after retries; missing fields: {}",
            missing_fields.join(", ")
        );
        AnalysisOutcome::Partial {
            partial: true,
            missing_fields,
            message,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, AnalysisOutcome::Partial { .. })
    }
}
