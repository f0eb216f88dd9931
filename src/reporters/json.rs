//! JSON reporter
//!
//! Writes the full scan result as pretty-printed JSON. The serialized
//! shape is the machine-readable contract: `{repo_root, commit_sha,
//! summary: {count, by_kind, avg_score}, items: [...]}`.

use crate::models::ScanResult;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name written into the repository root.
pub const OUTPUT_FILE: &str = "tech-debt.json";

/// Render the result as pretty-printed JSON.
pub fn render(result: &ScanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write the rendered JSON into the repository root.
pub fn write(result: &ScanResult, repo_root: &Path) -> Result<PathBuf> {
    let path = repo_root.join(OUTPUT_FILE);
    std::fs::write(&path, render(result)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
