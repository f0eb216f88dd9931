//! Config-drift detector
//!
//! Two stale-convention checks over build and CI configuration:
//! container build files whose base image floats on a `latest` tag, and
//! CI workflow steps referencing an external action without pinning it to
//! a full 40-character commit hash. Both reuse the `deprecated` component
//! at a fixed 0.3 as a generic "stale convention" signal.

use crate::config::ScanConfig;
use crate::detectors::base::{FileContext, FileDetector};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::Weights;
use regex::Regex;
use std::sync::OnceLock;

/// Stale-convention strength for every drift item.
const DRIFT_SIGNAL: f64 = 0.3;

static PINNED_ACTION: OnceLock<Regex> = OnceLock::new();

fn pinned_action_pattern() -> &'static Regex {
    PINNED_ACTION.get_or_init(|| Regex::new(r"@[0-9a-f]{40}\b").expect("valid regex"))
}

pub struct ConfigDriftDetector {
    weights: Weights,
}

impl ConfigDriftDetector {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            weights: config.weights.clone(),
        }
    }

    fn drift_item(&self, rel_path: &str, line: &str) -> DebtItem {
        let components = ComponentVector {
            deprecated: DRIFT_SIGNAL,
            ..Default::default()
        };
        DebtItem::new(rel_path, DebtKind::ConfigDrift, components, &self.weights)
            .with_meta("line", line.trim())
    }

    fn is_workflow_file(rel_path: &str) -> bool {
        rel_path.starts_with(".github/workflows/")
            && (rel_path.ends_with(".yml") || rel_path.ends_with(".yaml"))
    }
}

impl FileDetector for ConfigDriftDetector {
    fn name(&self) -> &'static str {
        "config-drift"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem> {
        let mut items = Vec::new();

        let base = ctx.rel_path.rsplit('/').next().unwrap_or(ctx.rel_path);
        if base.eq_ignore_ascii_case("dockerfile") {
            for line in ctx.content.lines() {
                let trimmed = line.trim();
                if trimmed.to_lowercase().starts_with("from ") && trimmed.contains(":latest") {
                    items.push(self.drift_item(ctx.rel_path, line));
                }
            }
        }

        if Self::is_workflow_file(ctx.rel_path) {
            for line in ctx.content.lines() {
                if line.contains("uses:") && !pinned_action_pattern().is_match(line) {
                    items.push(self.drift_item(ctx.rel_path, line));
                }
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::base::test_context;

    fn detector() -> ConfigDriftDetector {
        ConfigDriftDetector::new(&ScanConfig::default())
    }

    #[test]
    fn test_floating_base_image() {
        let ctx = test_context(
            "Dockerfile",
            "FROM node:latest\nRUN npm ci\nFROM nginx:1.25 AS web\n",
        );
        let items = detector().detect(&ctx);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DebtKind::ConfigDrift);
        assert_eq!(items[0].components.deprecated, DRIFT_SIGNAL);
        assert_eq!(items[0].meta["line"], "FROM node:latest");
    }

    #[test]
    fn test_unpinned_workflow_actions() {
        let pinned = "a".repeat(40);
        let content = format!(
            "jobs:\n  build:\n    steps:\n      - uses: actions/checkout@v4\n      - uses: actions/cache@{pinned}\n"
        );
        let ctx = test_context(".github/workflows/ci.yml", &content);
        let items = detector().detect(&ctx);
        // Tag pins are flagged, full-hash pins are not
        assert_eq!(items.len(), 1);
        assert!(items[0].meta["line"]
            .as_str()
            .expect("line string")
            .contains("actions/checkout@v4"));
    }

    #[test]
    fn test_workflow_path_required() {
        let ctx = test_context("docs/example.yml", "- uses: actions/checkout@v4\n");
        assert!(detector().detect(&ctx).is_empty());
    }

    #[test]
    fn test_one_item_per_offending_line() {
        let ctx = test_context(
            ".github/workflows/release.yaml",
            "- uses: actions/checkout@v4\n- uses: softprops/action-gh-release@v1\n",
        );
        assert_eq!(detector().detect(&ctx).len(), 2);
    }
}
