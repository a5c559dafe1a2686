//! Grouping and token-budget batching of parsed files
//!
//! Files are grouped by inferred language, then each group is split into
//! batches whose estimated token cost stays under the configured per-request
//! budget. A single file that alone exceeds the budget still gets a batch of
//! its own; files are never dropped and never split mid-file.

use super::language::language_for_extension;
use super::types::ReviewBatch;
use crate::diff::FileDiff;

/// Coarse token-cost estimate for one file: `ceil(content length / 4)`.
/// This is the provider's billing heuristic, not an exact tokenizer.
pub fn estimate_tokens(file: &FileDiff) -> usize {
    file.content_len().div_ceil(4)
}

/// Group files by language, preserving original relative order within each
/// group. Group order follows first appearance in the input.
pub fn group_by_language(files: &[FileDiff]) -> Vec<(String, Vec<FileDiff>)> {
    let mut groups: Vec<(String, Vec<FileDiff>)> = Vec::new();

    for file in files {
        let language = language_for_extension(&file.extension()).to_string();
        match groups.iter_mut().find(|(name, _)| *name == language) {
            Some((_, members)) => members.push(file.clone()),
            None => groups.push((language, vec![file.clone()])),
        }
    }

    groups
}

/// Split one language group into token-bounded batches.
pub fn chunk_group(language: &str, files: Vec<FileDiff>, max_tokens: usize) -> Vec<ReviewBatch> {
    let mut batches = Vec::new();
    let mut current: Vec<FileDiff> = Vec::new();
    let mut current_tokens = 0usize;

    for file in files {
        let cost = estimate_tokens(&file);

        if !current.is_empty() && current_tokens + cost > max_tokens {
            batches.push(ReviewBatch {
                language: language.to_string(),
                files: std::mem::take(&mut current),
                estimated_tokens: current_tokens,
            });
            current_tokens = 0;
        }

        current_tokens += cost;
        current.push(file);
    }

    if !current.is_empty() {
        batches.push(ReviewBatch {
            language: language.to_string(),
            files: current,
            estimated_tokens: current_tokens,
        });
    }

    batches
}

/// Group then chunk the full file list.
pub fn build_batches(files: &[FileDiff], max_tokens: usize) -> Vec<ReviewBatch> {
    let mut batches = Vec::new();
    for (language, members) in group_by_language(files) {
        batches.extend(chunk_group(&language, members, max_tokens));
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffLine;

    fn file_with_content(path: &str, content_len: usize) -> FileDiff {
        let mut file = FileDiff::new(path);
        file.changes.push(DiffLine::added("x".repeat(content_len), 1));
        file
    }

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens(&file_with_content("a.js", 8)), 2);
        assert_eq!(estimate_tokens(&file_with_content("a.js", 9)), 3);
        assert_eq!(estimate_tokens(&file_with_content("a.js", 0)), 0);
    }

    #[test]
    fn test_grouping_preserves_order_within_language() {
        let files = vec![
            file_with_content("a.js", 4),
            file_with_content("b.py", 4),
            file_with_content("c.js", 4),
        ];
        let groups = group_by_language(&files);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "JavaScript");
        assert_eq!(groups[0].1[0].path, "a.js");
        assert_eq!(groups[0].1[1].path, "c.js");
        assert_eq!(groups[1].0, "Python");
    }

    #[test]
    fn test_budget_closes_batch() {
        let files = vec![
            file_with_content("a.js", 40), // 10 tokens
            file_with_content("b.js", 40),
            file_with_content("c.js", 40),
        ];
        let batches = chunk_group("JavaScript", files, 25);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].files.len(), 2);
        assert_eq!(batches[0].estimated_tokens, 20);
        assert_eq!(batches[1].files.len(), 1);
    }

    #[test]
    fn test_oversized_file_gets_own_batch() {
        let files = vec![
            file_with_content("small.js", 8),
            file_with_content("huge.js", 100_000),
            file_with_content("tail.js", 8),
        ];
        let batches = chunk_group("JavaScript", files, 100);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].files[0].path, "huge.js");
        assert!(batches[1].estimated_tokens > 100);
        // Every other batch respects the budget.
        assert!(batches[0].estimated_tokens <= 100);
        assert!(batches[2].estimated_tokens <= 100);
    }

    #[test]
    fn test_no_file_is_dropped() {
        let files: Vec<_> = (0..7)
            .map(|i| file_with_content(&format!("f{i}.rs"), 60))
            .collect();
        let batches = build_batches(&files, 30);
        let total: usize = batches.iter().map(|b| b.files.len()).sum();
        assert_eq!(total, 7);
    }
}
