//! Centralized file provider abstraction for detectors.
//!
//! Repo-wide detectors do not walk the filesystem themselves; they
//! receive a `FileProvider` carrying the eligible file list and file
//! contents. This keeps file I/O in one place and makes detectors easy
//! to exercise against in-memory fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies the eligible file set and file contents to detectors.
pub trait FileProvider: Send + Sync {
    /// Repository-relative paths of all eligible files, in walk order.
    fn files(&self) -> &[String];

    /// Read file content for a relative path. `None` on any read failure.
    fn content(&self, rel_path: &str) -> Option<Arc<String>>;

    /// The repository root path.
    fn repo_root(&self) -> &Path;

    /// Files whose extension matches any of `exts` (without leading dots).
    fn files_with_extensions(&self, exts: &[&str]) -> Vec<&str> {
        self.files()
            .iter()
            .map(String::as_str)
            .filter(|rel| {
                Path::new(rel)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| exts.contains(&e))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Real provider backed by the filesystem.
pub struct SourceFiles {
    files: Vec<String>,
    repo_root: PathBuf,
}

impl SourceFiles {
    /// Create a provider from an already-collected relative file list.
    pub fn new(files: Vec<String>, repo_root: PathBuf) -> Self {
        Self { files, repo_root }
    }
}

impl FileProvider for SourceFiles {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn content(&self, rel_path: &str) -> Option<Arc<String>> {
        let bytes = std::fs::read(self.repo_root.join(rel_path)).ok()?;
        Some(Arc::new(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

// ---------------------------------------------------------------------------
// Test-only mock
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MockFileProvider {
    files: Vec<String>,
    contents: std::collections::HashMap<String, Arc<String>>,
    repo_root: PathBuf,
}

#[cfg(test)]
impl MockFileProvider {
    /// Build a mock from `(relative_path, content)` pairs.
    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        let mut files = Vec::with_capacity(entries.len());
        let mut contents = std::collections::HashMap::with_capacity(entries.len());
        for (rel, body) in entries {
            files.push(rel.to_string());
            contents.insert(rel.to_string(), Arc::new(body.to_string()));
        }
        Self {
            files,
            contents,
            repo_root: PathBuf::from("/mock/repo"),
        }
    }
}

#[cfg(test)]
impl FileProvider for MockFileProvider {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn content(&self, rel_path: &str) -> Option<Arc<String>> {
        self.contents.get(rel_path).cloned()
    }

    fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_basics() {
        let provider = MockFileProvider::new(vec![
            ("src/index.ts", "export {};"),
            ("src/util.js", "module.exports = {};"),
            ("README.md", "# Hello"),
        ]);

        assert_eq!(provider.files().len(), 3);
        assert_eq!(
            provider.files_with_extensions(&["ts", "js"]),
            vec!["src/index.ts", "src/util.js"]
        );
        assert_eq!(
            provider.content("src/index.ts").expect("content").as_str(),
            "export {};"
        );
        assert!(provider.content("missing.ts").is_none());
        assert_eq!(provider.repo_root(), Path::new("/mock/repo"));
    }
}
