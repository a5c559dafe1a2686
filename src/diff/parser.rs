//! Unified-diff parsing and line classification
//!
//! Converts raw `git diff` text into structured [`FileDiff`] records with
//! independently tracked old/new line numbers. The parser is pure and
//! deterministic: no I/O, and it never fails on malformed input. Unrecognized
//! lines are skipped rather than rejected, so arbitrary git output always
//! yields a (possibly incomplete) parse instead of an error.

use super::types::{DiffLine, FileDiff};
use regex::Regex;

/// Extract the destination path from a `diff --git a/X b/Y` header line.
///
/// Splits on the literal substring `" b/"` and takes the second segment,
/// mirroring the behavior the renderer was built against. Known limitation:
/// a path that itself contains `" b/"` is truncated at that point. This is
/// deliberate for compatibility; see the boundary-condition test below.
pub fn destination_path(header_line: &str) -> String {
    header_line
        .split(" b/")
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Parse raw unified-diff text into an ordered list of file change sets.
///
/// Files appear in the output in the order their `diff --git` headers appear
/// in the input. A file section with no hunk lines (a pure rename, say) still
/// produces a `FileDiff` with an empty change list.
pub fn parse_diff(diff_content: &str) -> Vec<FileDiff> {
    let hunk_header_re = Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").unwrap();

    let mut files: Vec<FileDiff> = Vec::new();
    let mut current_file: Option<FileDiff> = None;
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;

    for line in diff_content.lines() {
        if line.starts_with("diff --git") {
            if let Some(file) = current_file.take() {
                files.push(file);
            }
            current_file = Some(FileDiff::new(destination_path(line)));
            old_line = 0;
            new_line = 0;
            continue;
        }

        // Malformed input before any file header
        let Some(file) = current_file.as_mut() else {
            continue;
        };

        if line.starts_with("@@") {
            if let Some(caps) = hunk_header_re.captures(line) {
                // Counter resets come from the hunk header itself. A header
                // that fails to parse is skipped without touching counters.
                old_line = caps[1].parse().unwrap_or(0);
                new_line = caps[2].parse().unwrap_or(0);
                file.changes.push(DiffLine::header(line));
            }
        } else if line.starts_with("+++") || line.starts_with("---") {
            // File-label metadata, not content
        } else if let Some(content) = line.strip_prefix('+') {
            file.changes.push(DiffLine::added(content, new_line));
            new_line += 1;
        } else if let Some(content) = line.strip_prefix('-') {
            file.changes.push(DiffLine::removed(content, old_line));
            old_line += 1;
        } else if let Some(content) = line.strip_prefix(' ') {
            file.changes.push(DiffLine::unchanged(content, old_line, new_line));
            old_line += 1;
            new_line += 1;
        }
        // Everything else (`\ No newline at end of file`, index/mode lines)
        // advances no counter and produces no DiffLine.
    }

    if let Some(file) = current_file.take() {
        files.push(file);
    }

    files
}
