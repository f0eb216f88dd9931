//! Scan orchestration
//!
//! The aggregator/ranker. Walks the eligible file set once, applies the
//! file-local detectors to every file (in parallel; results are collected
//! in discovery order so the run stays deterministic), applies the
//! repo-wide detectors, then stable-sorts by score descending, caps the
//! item count, and rolls up summary statistics.
//!
//! Eligibility filtering excludes paths matched by the repository's
//! ignore rules, paths matched by configured exclude globs, and binary
//! files (extension allow-list, else a NUL-byte probe over the first
//! 2 KB).

use crate::config::{glob_match, ScanConfig};
use crate::detectors::file_provider::{FileProvider, SourceFiles};
use crate::detectors::{count_loc, file_detectors, repo_detectors, FileContext, RepoContext};
use crate::git;
use crate::models::{DebtItem, ScanResult};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tracing::{debug, info};

/// Default safety cap on the number of reported items.
pub const DEFAULT_MAX_ITEMS: usize = 2000;

/// Default git-churn lookback window, in days.
pub const DEFAULT_SINCE_DAYS: u32 = 30;

/// Extensions always treated as text.
const TEXT_EXTENSIONS: &[&str] = &[
    "py", "ts", "tsx", "js", "jsx", "json", "yml", "yaml", "md", "txt", "toml", "ini", "env",
    "java", "go", "rs", "cpp", "c", "h", "hpp", "cs", "rb", "php", "sh", "bat", "ps1",
    "dockerfile",
];

/// Bytes probed for NUL when the extension is not in the allow-list.
const BINARY_PROBE_BYTES: usize = 2048;

/// Progress callback: (files processed, total files).
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Locate the repository root by walking up to the nearest `.git`.
///
/// Falls back to the starting path when no repository is found; a
/// directory without version control still scans.
pub fn find_repo_root(start: &Path) -> PathBuf {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    for dir in start.ancestors() {
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
    }
    start
}

pub struct Scanner {
    repo_root: PathBuf,
    config: ScanConfig,
    since_days: u32,
    max_items: usize,
}

impl Scanner {
    pub fn new(repo_root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            repo_root: repo_root.into(),
            config,
            since_days: DEFAULT_SINCE_DAYS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    /// Set the churn lookback window.
    pub fn with_since_days(mut self, days: u32) -> Self {
        self.since_days = days;
        self
    }

    /// Set the item cap.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    pub fn scan(&self) -> ScanResult {
        self.scan_with_progress(None)
    }

    pub fn scan_with_progress(&self, progress: Option<&ProgressFn<'_>>) -> ScanResult {
        let files = self.collect_files();
        info!(
            "Scanning {} files under {}",
            files.len(),
            self.repo_root.display()
        );

        let churn = match git::churn(&self.repo_root, self.since_days) {
            Ok(map) => map,
            Err(e) => {
                debug!("Churn unavailable: {e}");
                HashMap::new()
            }
        };

        let provider = SourceFiles::new(files.clone(), self.repo_root.clone());
        let detectors = file_detectors(&self.config);
        let total = files.len();
        let processed = AtomicUsize::new(0);

        // Indexed parallel map keeps discovery order, so score ties later
        // preserve the same emission order as a sequential pass.
        let mut items: Vec<DebtItem> = files
            .par_iter()
            .map(|rel| {
                let mut found = Vec::new();
                if let Some(content) = provider.content(rel) {
                    let ctx = FileContext {
                        repo_root: &self.repo_root,
                        rel_path: rel,
                        content: content.as_str(),
                        loc: count_loc(&content),
                        churn_lines: churn.get(rel.as_str()).copied().unwrap_or(0),
                    };
                    for detector in &detectors {
                        found.extend(detector.detect(&ctx));
                    }
                }
                if let Some(callback) = progress {
                    callback(processed.fetch_add(1, AtomicOrdering::Relaxed) + 1, total);
                }
                found
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let repo_ctx = RepoContext {
            repo_root: &self.repo_root,
            files: &provider,
            config: &self.config,
        };
        for detector in repo_detectors(&self.config) {
            items.extend(detector.detect(&repo_ctx));
        }

        // Stable sort: ties keep detector-emission order
        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        if items.len() > self.max_items {
            debug!("Capping {} items to {}", items.len(), self.max_items);
            items.truncate(self.max_items);
        }

        let commit_sha = match git::head_commit(&self.repo_root) {
            Ok(sha) => Some(sha),
            Err(e) => {
                debug!("Commit unavailable: {e}");
                None
            }
        };

        ScanResult::new(self.repo_root.display().to_string(), commit_sha, items)
    }

    /// Walk the repository and apply eligibility filtering. Returns
    /// repository-relative paths in sorted order, the fixed walk order
    /// the determinism contract relies on.
    fn collect_files(&self) -> Vec<String> {
        let walker = WalkBuilder::new(&self.repo_root)
            .hidden(false) // .github/workflows must stay visible
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(rel) = path.strip_prefix(&self.repo_root) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            if self.config.exclude.iter().any(|g| glob_match(g, &rel)) {
                continue;
            }
            if !is_text_file(path) {
                continue;
            }
            files.push(rel);
        }
        files.sort();
        files
    }
}

/// Extension allow-list first, then a NUL-byte probe over the first 2 KB.
fn is_text_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            return true;
        }
    }
    let Ok(mut file) = std::fs::File::open(path) else {
        return false;
    };
    let mut probe = [0u8; BINARY_PROBE_BYTES];
    let Ok(read) = file.read(&mut probe) else {
        return false;
    };
    memchr::memchr(0, &probe[..read]).is_none()
}
