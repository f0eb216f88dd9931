//! Umbrella GitHub issue reporter
//!
//! Summarizes the top scan items as a single checklist issue via the
//! `gh` CLI. Thin wrapper around one subprocess call: any failure is
//! reported back to the caller, never retried.

use crate::git::run_command;
use crate::models::ScanResult;
use anyhow::{Context, Result};
use std::path::Path;

/// Issue title used for the umbrella report.
const ISSUE_TITLE: &str = "Tech Debt Report";

/// Maximum items listed in the issue body.
const MAX_ISSUE_ITEMS: usize = 25;

/// Render the issue body checklist.
pub fn render_body(result: &ScanResult) -> String {
    let mut body = String::from("Automated tech debt report. Top items:\n\n");
    for item in result.items.iter().take(MAX_ISSUE_ITEMS) {
        body.push_str(&format!(
            "- [ ] {} — {} — score {:.2}\n",
            item.path, item.kind, item.score
        ));
    }
    body
}

/// Create a single umbrella issue summarizing the top items.
///
/// Returns `gh`'s stdout (usually the issue URL).
pub fn create_umbrella_issue(
    result: &ScanResult,
    repo_root: &Path,
    assignee: Option<&str>,
) -> Result<String> {
    let body = render_body(result);
    let mut argv = vec!["gh", "issue", "create", "-t", ISSUE_TITLE, "-b", body.as_str()];
    if let Some(assignee) = assignee {
        argv.extend(["-a", assignee]);
    }
    let out = run_command(&argv, repo_root).context("gh issue create failed")?;
    Ok(out.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_body_lists_top_items_as_checklist() {
        let body = render_body(&test_result());
        assert!(body.starts_with("Automated tech debt report."));
        assert!(body.contains("- [ ] src/app.ts — inline_marker — score"));
        assert!(body.contains("- [ ] package.json — dep_risk — score"));
    }
}
