//! Lint-suppression detector
//!
//! Flags files that silence a linter (`eslint-disable`, `# noqa`,
//! `@ts-ignore`, …). Emits exactly one item per file regardless of how
//! many suppressions it contains; the file is the unit of debt here.

use crate::config::ScanConfig;
use crate::detectors::base::{FileContext, FileDetector};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::Weights;
use regex::Regex;
use tracing::warn;

pub struct LintSuppressDetector {
    patterns: Vec<Regex>,
    weights: Weights,
    max_file_lines: usize,
}

impl LintSuppressDetector {
    pub fn new(config: &ScanConfig) -> Self {
        let patterns = config
            .lint
            .patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Skipping invalid lint-suppression pattern {p:?}: {e}");
                    None
                }
            })
            .collect();
        Self {
            patterns,
            weights: config.weights.clone(),
            max_file_lines: config.complexity.max_file_lines,
        }
    }
}

impl FileDetector for LintSuppressDetector {
    fn name(&self) -> &'static str {
        "lint-suppress"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem> {
        let Some(matched) = self.patterns.iter().find(|p| p.is_match(ctx.content)) else {
            return Vec::new();
        };

        let components = ComponentVector {
            lint_suppress: 1.0,
            churn: ctx.churn_component(),
            complexity: ctx.complexity_component(self.max_file_lines),
            ..Default::default()
        };
        vec![
            DebtItem::new(ctx.rel_path, DebtKind::LintSuppress, components, &self.weights)
                .with_meta("lines", ctx.loc)
                .with_meta("pattern", matched.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::base::test_context;

    fn detector() -> LintSuppressDetector {
        LintSuppressDetector::new(&ScanConfig::default())
    }

    #[test]
    fn test_one_item_per_file_not_per_occurrence() {
        let ctx = test_context(
            "app/views.py",
            "import os  # noqa\nimport sys  # noqa\nx = 1  # noqa\n",
        );
        let items = detector().detect(&ctx);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DebtKind::LintSuppress);
        assert_eq!(items[0].components.lint_suppress, 1.0);
    }

    #[test]
    fn test_matches_typescript_suppressions() {
        let ctx = test_context("src/a.ts", "// @ts-ignore\nconst x: number = \"1\";\n");
        assert_eq!(detector().detect(&ctx).len(), 1);
    }

    #[test]
    fn test_clean_file_produces_nothing() {
        let ctx = test_context("src/a.ts", "const x = 1;\nexport default x;\n");
        assert!(detector().detect(&ctx).is_empty());
    }
}
