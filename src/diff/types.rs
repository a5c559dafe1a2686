//! Type definitions for diff parsing

use serde::{Deserialize, Serialize};

/// Classification of a single diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Header,
    Added,
    Removed,
    Unchanged,
}

impl LineKind {
    pub fn as_str(&self) -> &str {
        match self {
            LineKind::Header => "header",
            LineKind::Added => "added",
            LineKind::Removed => "removed",
            LineKind::Unchanged => "unchanged",
        }
    }
}

/// One line of a parsed diff, with independently tracked old/new line numbers.
///
/// Hunk header lines carry `None` for both numbers; the UI renders those
/// as `...` rather than a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    pub kind: LineKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line_number: Option<u32>,
}

impl DiffLine {
    pub fn header(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Header,
            content: content.into(),
            old_line_number: None,
            new_line_number: None,
        }
    }

    pub fn added(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Added,
            content: content.into(),
            old_line_number: None,
            new_line_number: Some(new_line),
        }
    }

    pub fn removed(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Removed,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: None,
        }
    }

    pub fn unchanged(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Unchanged,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: Some(new_line),
        }
    }
}

/// One file's change set, in the order lines appear in the raw diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub changes: Vec<DiffLine>,
}

impl FileDiff {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            changes: Vec::new(),
        }
    }

    /// File extension (lowercased, without the dot), used for language
    /// classification. Empty when the path has no extension.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Total character length of all change contents, the basis for the
    /// token-cost estimate used by the chunker.
    pub fn content_len(&self) -> usize {
        self.changes.iter().map(|line| line.content.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        assert_eq!(FileDiff::new("src/App.TSX").extension(), "tsx");
        assert_eq!(FileDiff::new("Makefile").extension(), "");
        assert_eq!(FileDiff::new("lib/util.spec.js").extension(), "js");
    }

    #[test]
    fn test_content_len_sums_stripped_content() {
        let mut file = FileDiff::new("x.js");
        file.changes.push(DiffLine::added("abc", 1));
        file.changes.push(DiffLine::removed("de", 1));
        assert_eq!(file.content_len(), 5);
    }

    #[test]
    fn test_line_kind_strings() {
        assert_eq!(LineKind::Header.as_str(), "header");
        assert_eq!(LineKind::Added.as_str(), "added");
        assert_eq!(LineKind::Removed.as_str(), "removed");
        assert_eq!(LineKind::Unchanged.as_str(), "unchanged");
    }
}
