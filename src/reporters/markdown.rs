//! Markdown reporter
//!
//! Renders the scan result as GitHub-flavored Markdown suitable for
//! committing into the repository or posting as a PR comment.

use crate::models::ScanResult;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// File name written into the repository root.
pub const REPORT_FILE: &str = "TECH_DEBT.md";

/// Maximum items listed in the report table.
const MAX_TABLE_ITEMS: usize = 50;

/// Render the result as GitHub-flavored Markdown.
pub fn render(result: &ScanResult) -> String {
    let mut md = String::new();
    md.push_str(&render_header(result));
    md.push('\n');
    md.push_str(&render_summary(result));
    md.push('\n');
    md.push_str(&render_by_kind(result));
    md.push('\n');
    md.push_str(&render_items(result));
    md
}

fn render_header(result: &ScanResult) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let commit = result.commit_sha.as_deref().unwrap_or("(no git history)");
    format!("# Tech Debt Report\n\nGenerated: {timestamp} | Commit: `{commit}`\n")
}

fn render_summary(result: &ScanResult) -> String {
    format!(
        "## Summary\n\n\
         | Metric | Value |\n\
         |--------|-------|\n\
         | Items | {} |\n\
         | Average score | {:.2} |\n\
         | Repository | `{}` |\n",
        result.summary.count, result.summary.avg_score, result.repo_root
    )
}

fn render_by_kind(result: &ScanResult) -> String {
    let mut md = String::from("## Items by kind\n\n| Kind | Count |\n|------|-------|\n");
    for (kind, count) in &result.summary.by_kind {
        md.push_str(&format!("| {kind} | {count} |\n"));
    }
    md
}

fn render_items(result: &ScanResult) -> String {
    let mut md = String::from(
        "## Top items\n\n\
         | Score | Bucket | Kind | Path | Owner |\n\
         |-------|--------|------|------|-------|\n",
    );
    for item in result.items.iter().take(MAX_TABLE_ITEMS) {
        let bucket = item
            .meta
            .get("priority_bucket")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        let owner = item.owner.as_deref().unwrap_or("-");
        md.push_str(&format!(
            "| {:.2} | {} | {} | `{}` | {} |\n",
            item.score, bucket, item.kind, item.path, owner
        ));
    }
    if result.items.len() > MAX_TABLE_ITEMS {
        md.push_str(&format!(
            "\n…and {} more items in `tech-debt.json`.\n",
            result.items.len() - MAX_TABLE_ITEMS
        ));
    }
    md
}

/// Write the rendered report into the repository root.
pub fn write(result: &ScanResult, repo_root: &Path) -> Result<PathBuf> {
    let path = repo_root.join(REPORT_FILE);
    std::fs::write(&path, render(result))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_render_sections() {
        let md = render(&test_result());
        assert!(md.starts_with("# Tech Debt Report"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("## Items by kind"));
        assert!(md.contains("## Top items"));
        assert!(md.contains("`src/app.ts`"));
        assert!(md.contains("alice"));
        assert!(md.contains("`abc123`"));
    }

    #[test]
    fn test_render_empty_result() {
        let result = ScanResult::new("/repo".to_string(), None, Vec::new());
        let md = render(&result);
        assert!(md.contains("| Items | 0 |"));
        assert!(md.contains("(no git history)"));
    }
}
