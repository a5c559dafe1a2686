//! Prompt construction for batched review and single-prompt analysis

use super::language::guidelines_for_language;
use super::types::ReviewBatch;
use crate::diff::{FileDiff, LineKind};

const REVIEW_INSTRUCTIONS: &str = "\
You are a senior code reviewer. Review the diffs below and report concrete \
findings in these categories: bugs, performance, security, style, and \
possible improvements. Only comment on the changed code shown; do not \
speculate about code you cannot see.";

const RESPONSE_SHAPE: &str = r#"Respond with ONLY a JSON object of this exact shape:
{"files":[{"path":"<file path>","issues":[{"title":"...","description":"...","severity":"high|medium|low","line":123}],"suggestions":["..."]}]}
The "line" field is optional. Include one entry per file, using the exact
path given. Do not wrap the JSON in markdown fences or prose."#;

/// Render one file's changes for inclusion in a prompt. Only the hunks are
/// sent, never unrelated repository content.
fn render_file(file: &FileDiff) -> String {
    let mut out = format!("### {}\n", file.path);
    for line in &file.changes {
        match line.kind {
            LineKind::Header => {
                out.push_str(&line.content);
            }
            LineKind::Added => {
                out.push('+');
                out.push_str(&line.content);
            }
            LineKind::Removed => {
                out.push('-');
                out.push_str(&line.content);
            }
            LineKind::Unchanged => {
                out.push(' ');
                out.push_str(&line.content);
            }
        }
        out.push('\n');
    }
    out
}

/// Build the full prompt for one batch of same-language files.
pub fn batch_prompt(batch: &ReviewBatch, focus: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str(REVIEW_INSTRUCTIONS);
    prompt.push_str("\n\nLanguage: ");
    prompt.push_str(&batch.language);
    prompt.push('\n');
    prompt.push_str(guidelines_for_language(&batch.language));
    prompt.push_str("\n\n");

    if let Some(focus) = focus {
        prompt.push_str("Reviewer focus request: ");
        prompt.push_str(focus);
        prompt.push_str("\n\n");
    }

    prompt.push_str(RESPONSE_SHAPE);
    prompt.push_str("\n\nFiles under review:\n");
    for file in &batch.files {
        prompt.push_str(&render_file(file));
        prompt.push('\n');
    }

    prompt
}

/// Retry prompt for the single-prompt analysis path: the original prompt
/// augmented with the exact field names the previous response was missing.
pub fn retry_prompt(original: &str, missing_fields: &[String]) -> String {
    format!(
        "{original}\n\nYour previous response was missing these required \
         fields: {}. Respond again with a complete JSON object containing \
         every required field.",
        missing_fields.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffLine;

    fn sample_batch() -> ReviewBatch {
        let mut file = FileDiff::new("src/auth.js");
        file.changes.push(DiffLine::header("@@ -1,2 +1,2 @@"));
        file.changes.push(DiffLine::removed("var token = req.query.t", 1));
        file.changes.push(DiffLine::added("const token = req.query.t", 1));
        ReviewBatch {
            language: "JavaScript".to_string(),
            files: vec![file],
            estimated_tokens: 12,
        }
    }

    #[test]
    fn test_batch_prompt_contains_paths_and_hunks() {
        let prompt = batch_prompt(&sample_batch(), None);
        assert!(prompt.contains("### src/auth.js"));
        assert!(prompt.contains("@@ -1,2 +1,2 @@"));
        assert!(prompt.contains("-var token"));
        assert!(prompt.contains("+const token"));
        assert!(prompt.contains("\"files\""));
        assert!(prompt.contains("Language: JavaScript"));
    }

    #[test]
    fn test_focus_is_included_when_present() {
        let prompt = batch_prompt(&sample_batch(), Some("look at error handling"));
        assert!(prompt.contains("look at error handling"));

        let without = batch_prompt(&sample_batch(), None);
        assert!(!without.contains("Reviewer focus request"));
    }

    #[test]
    fn test_retry_prompt_names_missing_fields() {
        let retry = retry_prompt(
            "analyze this",
            &["summary".to_string(), "complexity.overall".to_string()],
        );
        assert!(retry.starts_with("analyze this"));
        assert!(retry.contains("summary, complexity.overall"));
    }
}
