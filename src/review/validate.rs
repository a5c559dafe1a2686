//! Single-prompt analysis with schema validation and bounded retries
//!
//! The batched path and this path fail differently on purpose: batches
//! always substitute per-file placeholders, while this path retries the
//! whole prompt with the missing field names spelled out and, once the
//! attempt budget is spent, returns a partial-result object the caller
//! renders as a degraded (not failed) analysis.

use super::client::CompletionClient;
use super::prompt::retry_prompt;
use super::types::AnalysisOutcome;
use crate::error::{ScoutError, ScoutResult};
use serde_json::Value;
use tracing::{debug, warn};

/// Top-level fields every complete analysis must carry.
const REQUIRED_FIELDS: &[&str] = &[
    "summary",
    "severity",
    "issues",
    "recommendations",
    "complexity",
];

/// Locate the first brace-delimited JSON object inside a completion, which
/// may wrap it in prose or markdown fences. String contents and escapes are
/// honored when balancing braces.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Names of required fields absent from a parsed analysis, in a stable
/// order, using dotted/indexed paths for the nested checks.
pub fn missing_fields(value: &Value) -> Vec<String> {
    let mut missing = Vec::new();

    for &field in REQUIRED_FIELDS {
        if value.get(field).is_none() {
            missing.push(field.to_string());
        }
    }

    if let Some(complexity) = value.get("complexity") {
        if complexity.get("overall").is_none() {
            missing.push("complexity.overall".to_string());
        }
    }

    if let Some(issues) = value.get("issues").and_then(|v| v.as_array()) {
        if let Some(first) = issues.first() {
            for key in ["title", "description", "severity"] {
                if first.get(key).is_none() {
                    missing.push(format!("issues[0].{key}"));
                }
            }
        }
    }

    missing
}

/// Run one prompt through the endpoint until the response carries every
/// required field, retrying with explicit feedback up to `max_attempts`
/// total calls.
///
/// Exhaustion through schema problems degrades to
/// [`AnalysisOutcome::Partial`]; exhaustion through nothing but transport
/// failures surfaces the last transport error.
pub async fn validate_analysis(
    client: &dyn CompletionClient,
    prompt: &str,
    max_attempts: u32,
) -> ScoutResult<AnalysisOutcome> {
    let mut current_prompt = prompt.to_string();
    let mut last_missing: Vec<String> = Vec::new();
    let mut last_transport: Option<ScoutError> = None;

    for attempt in 1..=max_attempts.max(1) {
        let completion = match client.complete(&current_prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(attempt, %err, "analysis call failed");
                last_transport = Some(err);
                continue;
            }
        };

        let parsed = extract_json_object(&completion)
            .and_then(|json| serde_json::from_str::<Value>(json).ok());

        let missing = match parsed {
            Some(value) => {
                let missing = missing_fields(&value);
                if missing.is_empty() {
                    debug!(attempt, "analysis complete");
                    return Ok(AnalysisOutcome::Complete(value));
                }
                missing
            }
            // No parsable object at all: everything required is missing.
            None => REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
        };

        warn!(attempt, missing = ?missing, "analysis response incomplete");
        current_prompt = retry_prompt(prompt, &missing);
        last_missing = missing;
    }

    if last_missing.is_empty() {
        // Every attempt died in transport; nothing to degrade into.
        Err(last_transport
            .unwrap_or_else(|| ScoutError::Transport("no attempts were made".to_string())))
    } else {
        Ok(AnalysisOutcome::partial(last_missing))
    }
}
