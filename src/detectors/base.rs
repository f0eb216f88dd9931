//! Detector traits and detection contexts
//!
//! Detection runs in two passes: file-local detectors see one
//! [`FileContext`] per eligible file, repo-wide detectors see a single
//! [`RepoContext`] spanning the full file set. Every detector
//! independently produces a fully-populated component vector; dimensions
//! that do not apply to its signal stay at 0.0.

use crate::config::ScanConfig;
use crate::detectors::file_provider::FileProvider;
use crate::models::DebtItem;
use crate::scoring::normalize;
use chrono::Utc;
use std::path::Path;
use tracing::debug;

/// Ceiling for the age component: a year without commits saturates it.
pub const AGE_CEILING_DAYS: f64 = 365.0;

/// Ceiling for the churn component, in added+deleted lines.
pub const CHURN_CEILING_LINES: f64 = 2000.0;

/// Non-blank line count of a file body.
pub fn count_loc(content: &str) -> usize {
    content.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Per-file detection context for the first scan pass.
pub struct FileContext<'a> {
    pub repo_root: &'a Path,
    /// Repository-relative path with forward slashes.
    pub rel_path: &'a str,
    pub content: &'a str,
    /// Non-blank line count.
    pub loc: usize,
    /// Added+deleted lines for this path within the lookback window.
    pub churn_lines: u64,
}

impl FileContext<'_> {
    /// Normalized churn component for this file.
    pub fn churn_component(&self) -> f64 {
        normalize(self.churn_lines as f64, CHURN_CEILING_LINES)
    }

    /// Normalized complexity component (non-blank LOC over the ceiling).
    pub fn complexity_component(&self, max_file_lines: usize) -> f64 {
        normalize(self.loc as f64, max_file_lines as f64)
    }

    /// Days since the file's last commit, via a best-effort git query.
    ///
    /// `None` when the path has no reachable history; callers score that
    /// as zero. Detectors call this at most once per file.
    pub fn age_days(&self) -> Option<f64> {
        match crate::git::last_modified(self.repo_root, self.rel_path) {
            Ok(timestamp) => {
                let days = (Utc::now() - timestamp).num_days();
                Some(days.max(0) as f64)
            }
            Err(e) => {
                debug!("No history for {}: {}", self.rel_path, e);
                None
            }
        }
    }
}

/// Repository-wide detection context for the second pass.
pub struct RepoContext<'a> {
    pub repo_root: &'a Path,
    pub files: &'a dyn FileProvider,
    pub config: &'a ScanConfig,
}

/// A detector applied to every eligible file in the per-file pass.
pub trait FileDetector: Send + Sync {
    /// Unique identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Run detection against one file. Pure: no shared mutable state.
    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem>;
}

/// A detector applied once against the full file set in the repo-wide pass.
pub trait RepoDetector: Send + Sync {
    /// Unique identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Run detection against the repository as a whole.
    fn detect(&self, ctx: &RepoContext<'_>) -> Vec<DebtItem>;
}

/// Build a [`FileContext`] for an in-memory file body.
#[cfg(test)]
pub fn test_context<'a>(rel_path: &'a str, content: &'a str) -> FileContext<'a> {
    FileContext {
        repo_root: Path::new("/mock/repo"),
        rel_path,
        content,
        loc: count_loc(content),
        churn_lines: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_loc_skips_blank_lines() {
        assert_eq!(count_loc("a\n\n  \nb\n"), 2);
        assert_eq!(count_loc(""), 0);
        assert_eq!(count_loc("   \n\t\n"), 0);
    }

    #[test]
    fn test_age_degrades_without_history() {
        let ctx = test_context("src/app.ts", "let x = 1;\n");
        assert_eq!(ctx.age_days(), None);
    }
}
