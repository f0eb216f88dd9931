//! Test-gap detector
//!
//! For each file matching a configured source glob, derives candidate
//! test-file locations via fixed path-rewrite conventions and flags the
//! file when none of the candidates exist in the test-glob match set.
//! The complexity component is a fixed 0.5 here: the gap is about
//! coverage, not file size.

use crate::config::{glob_match, ScanConfig};
use crate::detectors::base::{RepoContext, RepoDetector};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::Weights;
use serde_json::Value;
use std::collections::BTreeSet;

/// Fixed complexity signal for a missing-test item.
const GAP_COMPLEXITY: f64 = 0.5;

pub struct TestGapDetector {
    weights: Weights,
}

impl TestGapDetector {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            weights: config.weights.clone(),
        }
    }
}

/// Candidate test locations for a source file, by fixed conventions.
///
/// `None` for extensions without a convention.
fn test_candidates(rel_path: &str) -> Option<Vec<String>> {
    let base = rel_path.rsplit('/').next().unwrap_or(rel_path);
    let (stem, ext) = base.rsplit_once('.')?;

    let raw = match ext {
        "ts" => vec![
            swap_segment(rel_path, "src", "tests").replace(".ts", ".test.ts"),
            format!("tests/{stem}.test.ts"),
            format!("tests/{base}"),
        ],
        "py" => vec![
            swap_segment(rel_path, "app", "tests"),
            format!("tests/{base}"),
        ],
        _ => return None,
    };

    let mut candidates: Vec<String> = Vec::with_capacity(raw.len());
    for candidate in raw {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    Some(candidates)
}

/// Replace every `from` path segment with `to`.
fn swap_segment(rel_path: &str, from: &str, to: &str) -> String {
    rel_path
        .split('/')
        .map(|segment| if segment == from { to } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

impl RepoDetector for TestGapDetector {
    fn name(&self) -> &'static str {
        "test-gap"
    }

    fn detect(&self, ctx: &RepoContext<'_>) -> Vec<DebtItem> {
        let convention = &ctx.config.tests;
        let files = ctx.files.files();

        let test_set: BTreeSet<&str> = files
            .iter()
            .map(String::as_str)
            .filter(|rel| convention.test_globs.iter().any(|g| glob_match(g, rel)))
            .collect();

        let mut items = Vec::new();
        for rel in files {
            if !convention.src_globs.iter().any(|g| glob_match(g, rel)) {
                continue;
            }
            // A test file cannot be its own gap
            if test_set.contains(rel.as_str()) {
                continue;
            }
            let Some(candidates) = test_candidates(rel) else {
                continue;
            };
            if candidates.iter().any(|c| test_set.contains(c.as_str())) {
                continue;
            }

            let components = ComponentVector {
                no_tests: 1.0,
                complexity: GAP_COMPLEXITY,
                ..Default::default()
            };
            let expected: Vec<Value> = candidates.into_iter().map(Value::String).collect();
            items.push(
                DebtItem::new(rel, DebtKind::TestGap, components, &self.weights)
                    .with_meta("expected_tests", Value::Array(expected)),
            );
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::file_provider::MockFileProvider;
    use std::path::Path;

    fn run(provider: &MockFileProvider) -> Vec<DebtItem> {
        let config = ScanConfig::default();
        let ctx = RepoContext {
            repo_root: Path::new("/mock/repo"),
            files: provider,
            config: &config,
        };
        TestGapDetector::new(&config).detect(&ctx)
    }

    #[test]
    fn test_untested_source_flagged_once() {
        let provider = MockFileProvider::new(vec![
            ("src/foo.ts", "export const foo = 1;\n"),
            ("src/bar.ts", "export const bar = 2;\n"),
            ("tests/bar.test.ts", "import { bar } from \"../src/bar\";\n"),
        ]);
        let items = run(&provider);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.path, "src/foo.ts");
        assert_eq!(item.kind, DebtKind::TestGap);
        assert_eq!(item.components.no_tests, 1.0);
        assert_eq!(item.components.complexity, GAP_COMPLEXITY);

        let expected = item.meta["expected_tests"].as_array().expect("array");
        assert!(expected.contains(&Value::String("tests/foo.test.ts".to_string())));
    }

    #[test]
    fn test_test_file_is_never_its_own_gap() {
        let provider = MockFileProvider::new(vec![
            ("src/widget.ts", "export {};\n"),
            ("src/widget.test.ts", "import {} from \"./widget\";\n"),
        ]);
        // src/widget.test.ts matches both the src glob and the test glob;
        // it must not be reported. src/widget.ts still is: sibling tests
        // are not among the fixed candidate conventions.
        let items = run(&provider);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "src/widget.ts");
    }

    #[test]
    fn test_python_app_convention() {
        let provider = MockFileProvider::new(vec![
            ("app/models.py", "class Model: ...\n"),
            ("tests/models.py", "def test_model(): ...\n"),
        ]);
        assert!(run(&provider).is_empty());
    }

    #[test]
    fn test_candidate_paths() {
        let candidates = test_candidates("src/deep/foo.ts").expect("ts candidates");
        assert_eq!(
            candidates,
            vec![
                "tests/deep/foo.test.ts".to_string(),
                "tests/foo.test.ts".to_string(),
                "tests/foo.ts".to_string(),
            ]
        );
        assert!(test_candidates("src/style.css").is_none());
    }
}
