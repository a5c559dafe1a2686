//! Batched review orchestration
//!
//! Drives the full pipeline: group and batch files, build one prompt per
//! batch, call the completion endpoint sequentially, match results back to
//! the submitted files, and aggregate a summary. Every submitted file gets
//! exactly one result; transport and parse failures degrade into per-file
//! placeholders instead of aborting the review.

use super::chunker::build_batches;
use super::client::CompletionClient;
use super::prompt::batch_prompt;
use super::types::{
    Issue, IssueCount, ReviewBatch, ReviewReport, ReviewResult, ReviewSummary, Severity, TopIssue,
};
use super::validate::extract_json_object;
use crate::config::ReviewConfig;
use crate::diff::FileDiff;
use crate::error::ScoutResult;
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::{debug, error, warn};

pub struct ReviewEngine<'a> {
    client: &'a dyn CompletionClient,
    config: ReviewConfig,
}

impl<'a> ReviewEngine<'a> {
    pub fn new(client: &'a dyn CompletionClient, config: ReviewConfig) -> Self {
        Self { client, config }
    }

    /// Review the given files. Completes even when individual batches fail;
    /// output cardinality always equals input cardinality.
    pub async fn review(&self, files: &[FileDiff], focus: Option<&str>) -> ReviewReport {
        let (_guard, cancel) = watch::channel(false);
        self.review_with_cancel(files, focus, cancel).await
    }

    /// Like [`review`](Self::review), but aborts when the watch channel
    /// flips to `true`: the in-flight call is dropped and every file in the
    /// cancelled and remaining batches gets a failure placeholder. Work
    /// already completed is kept.
    pub async fn review_with_cancel(
        &self,
        files: &[FileDiff],
        focus: Option<&str>,
        mut cancel: watch::Receiver<bool>,
    ) -> ReviewReport {
        let batches = build_batches(files, self.config.max_tokens_per_request);
        debug!(files = files.len(), batches = batches.len(), "starting review");

        let mut results: Vec<ReviewResult> = Vec::new();
        let mut cancelled = *cancel.borrow();

        for batch in &batches {
            if cancelled {
                results.extend(placeholder_results(batch));
                continue;
            }

            let prompt = batch_prompt(batch, focus);
            match self.complete_or_cancel(&prompt, &mut cancel).await {
                None => {
                    warn!(language = %batch.language, "review cancelled mid-batch");
                    cancelled = true;
                    results.extend(placeholder_results(batch));
                }
                Some(Err(err)) => {
                    error!(language = %batch.language, %err, "AI call failed for batch");
                    results.extend(placeholder_results(batch));
                }
                Some(Ok(completion)) => match parse_batch_response(&completion, batch) {
                    Some(batch_results) => results.extend(batch_results),
                    None => {
                        warn!(
                            language = %batch.language,
                            "AI response did not contain a valid files array"
                        );
                        results.extend(placeholder_results(batch));
                    }
                },
            }
        }

        let summary = summarize(&results, self.config.top_issue_limit);
        ReviewReport { summary, files: results }
    }

    /// Await the completion call, racing it against cancellation. `None`
    /// means the call was abandoned because the channel flipped to `true`.
    async fn complete_or_cancel(
        &self,
        prompt: &str,
        cancel: &mut watch::Receiver<bool>,
    ) -> Option<ScoutResult<String>> {
        let mut call = self.client.complete(prompt);
        loop {
            tokio::select! {
                result = &mut call => return Some(result),
                changed = cancel.changed() => match changed {
                    Ok(()) if *cancel.borrow() => return None,
                    Ok(()) => continue,
                    // Sender dropped: cancellation can never fire.
                    Err(_) => return Some(call.await),
                },
            }
        }
    }
}

/// One "Analysis failed" result per file in a batch whose call or parse
/// did not produce usable output.
fn placeholder_results(batch: &ReviewBatch) -> Vec<ReviewResult> {
    batch
        .files
        .iter()
        .map(|file| ReviewResult::analysis_failed(&file.path, &batch.language))
        .collect()
}

/// Parse a completion into per-file results, matching by path against the
/// ORIGINAL batch order. Files the response omits get the default
/// "no specific issues" result; extra paths in the response are dropped.
/// Returns `None` when no parsable `files` array exists at all.
fn parse_batch_response(completion: &str, batch: &ReviewBatch) -> Option<Vec<ReviewResult>> {
    let json_text = extract_json_object(completion)?;
    let value: serde_json::Value = serde_json::from_str(json_text).ok()?;
    let entries = value.get("files")?.as_array()?;

    let mut by_path: HashMap<&str, &serde_json::Value> = HashMap::new();
    for entry in entries {
        if let Some(path) = entry.get("path").and_then(|p| p.as_str()) {
            by_path.insert(path, entry);
        }
    }

    let results = batch
        .files
        .iter()
        .map(|file| match by_path.get(file.path.as_str()) {
            Some(entry) => result_from_entry(&file.path, &batch.language, entry),
            None => ReviewResult::not_mentioned(&file.path, &batch.language),
        })
        .collect();

    Some(results)
}

/// Convert one response entry to a ReviewResult, tolerating missing or
/// mistyped fields on a per-issue basis.
fn result_from_entry(path: &str, language: &str, entry: &serde_json::Value) -> ReviewResult {
    let issues = entry
        .get("issues")
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(issue_from_value).collect())
        .unwrap_or_default();

    let suggestions = entry
        .get("suggestions")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    ReviewResult {
        path: path.to_string(),
        file_type: language.to_string(),
        issues,
        suggestions,
    }
}

fn issue_from_value(value: &serde_json::Value) -> Option<Issue> {
    let title = value.get("title")?.as_str()?.to_string();
    Some(Issue {
        title,
        description: value
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or_default()
            .to_string(),
        severity: value
            .get("severity")
            .and_then(|s| s.as_str())
            .map(Severity::parse_lenient)
            .unwrap_or(Severity::Low),
        line: value
            .get("line")
            .and_then(|l| l.as_u64())
            .map(|l| l as u32),
    })
}

/// Aggregate issue counts, overall quality, and the first-seen top
/// high-severity issues across all results.
pub fn summarize(results: &[ReviewResult], top_issue_limit: usize) -> ReviewSummary {
    let mut count = IssueCount::default();
    let mut top_issues = Vec::new();

    for result in results {
        for issue in &result.issues {
            match issue.severity {
                Severity::High => count.high += 1,
                Severity::Medium => count.medium += 1,
                Severity::Low => count.low += 1,
            }
            if issue.severity == Severity::High && top_issues.len() < top_issue_limit {
                top_issues.push(TopIssue {
                    file: result.path.clone(),
                    title: issue.title.clone(),
                    severity: issue.severity,
                    line: issue.line,
                });
            }
        }
    }
    count.total = count.high + count.medium + count.low;

    let overall_quality = if count.high > 0 {
        "needs work"
    } else if count.medium > 3 {
        "fair"
    } else {
        "good"
    };

    ReviewSummary {
        files_analyzed: results.len(),
        issue_count: count,
        overall_quality: overall_quality.to_string(),
        top_issues,
        generated_at: chrono::Utc::now(),
    }
}
