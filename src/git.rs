//! Thin wrapper around the `git` CLI
//!
//! Actual git operations are delegated to the external `git` process; this
//! crate never reimplements them. The helper is an explicitly constructed
//! service object so callers (and tests) control which repository it
//! points at.

use crate::error::{ScoutError, ScoutResult};
use std::path::PathBuf;
use std::process::Command;

pub struct GitHelper {
    repo: PathBuf,
}

impl GitHelper {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn run(&self, args: &[&str]) -> ScoutResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| ScoutError::Git(format!("Failed to execute git: {}", e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ScoutError::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )))
        }
    }

    /// Raw unified diff between two refs, optionally narrowed to paths.
    pub fn diff_range(&self, base: &str, head: &str, paths: &[String]) -> ScoutResult<String> {
        let range = format!("{}..{}", base, head);
        let mut args = vec!["diff", range.as_str()];
        if !paths.is_empty() {
            args.push("--");
            args.extend(paths.iter().map(String::as_str));
        }
        self.run(&args)
    }

    /// Local branch names, current branch first as git lists it.
    pub fn list_branches(&self) -> ScoutResult<Vec<String>> {
        let output = self.run(&["branch", "--format=%(refname:short)"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn repo_root(&self) -> ScoutResult<String> {
        Ok(self
            .run(&["rev-parse", "--show-toplevel"])?
            .trim()
            .to_string())
    }
}
