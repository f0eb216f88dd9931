//! Dependency-risk detector
//!
//! Reads the dependency manifest and emits two advisory signals: declared
//! versions using a loose-range specifier, and declared packages that no
//! source file appears to import. The usage scan is deliberately
//! heuristic (dynamic imports, re-exports, and unusual import styles will
//! produce false positives); items are advisory, not authoritative.

use crate::detectors::base::{RepoContext, RepoDetector};
use crate::detectors::file_provider::FileProvider;
use crate::models::{ComponentVector, DebtItem, DebtKind};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Signal strength for a loose version range.
const LOOSE_RANGE_SIGNAL: f64 = 1.0;
/// Signal strength for a possibly-unused dependency.
const POSSIBLY_UNUSED_SIGNAL: f64 = 0.7;

/// Manifest tables holding dependency declarations.
const DEPENDENCY_TABLES: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Source extensions scanned for import statements.
const IMPORT_SOURCE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

static IMPORT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn import_pattern() -> &'static Regex {
    IMPORT_PATTERN.get_or_init(|| {
        Regex::new(r#"(?:\bfrom\s+|\brequire\s*\(\s*|\bimport\s*\(\s*|\bimport\s+)["']([^"']+)["']"#)
            .expect("valid regex")
    })
}

/// A version specifier that permits automatic upgrades within a range.
fn is_loose_range(version: &str) -> bool {
    version
        .chars()
        .any(|c| matches!(c, '^' | '~' | '*' | 'x' | 'X'))
}

/// Normalize an import specifier to its top-level package name.
///
/// `@scope/pkg/sub` → `@scope/pkg`, `pkg/sub/path` → `pkg`.
fn top_level_package(spec: &str) -> String {
    let mut segments = spec.split('/');
    if spec.starts_with('@') {
        match (segments.next(), segments.next()) {
            (Some(scope), Some(name)) => format!("{scope}/{name}"),
            _ => spec.to_string(),
        }
    } else {
        segments.next().unwrap_or(spec).to_string()
    }
}

pub struct DepRiskDetector {
    weights: crate::scoring::Weights,
}

impl DepRiskDetector {
    pub fn new(config: &crate::config::ScanConfig) -> Self {
        Self {
            weights: config.weights.clone(),
        }
    }

    fn risk_item(&self, manifest_rel: &str, signal: f64) -> DebtItem {
        let components = ComponentVector {
            deps_outdated: signal,
            ..Default::default()
        };
        DebtItem::new(manifest_rel, DebtKind::DepRisk, components, &self.weights)
    }

    /// Best-effort static usage scan over the source file set.
    fn used_packages(&self, files: &dyn FileProvider) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        for rel in files.files_with_extensions(&IMPORT_SOURCE_EXTENSIONS) {
            let Some(content) = files.content(rel) else {
                continue;
            };
            for caps in import_pattern().captures_iter(&content) {
                let spec = &caps[1];
                if spec.starts_with('.') {
                    continue;
                }
                used.insert(top_level_package(spec));
            }
        }
        used
    }
}

impl RepoDetector for DepRiskDetector {
    fn name(&self) -> &'static str {
        "dep-risk"
    }

    fn detect(&self, ctx: &RepoContext<'_>) -> Vec<DebtItem> {
        let manifest_rel = ctx.config.dependencies.package_file.as_str();
        let Some(raw) = ctx.files.content(manifest_rel) else {
            debug!("No {manifest_rel} found, skipping dependency scan");
            return Vec::new();
        };

        if !ctx
            .config
            .dependencies
            .lock_files
            .iter()
            .any(|lock| ctx.repo_root.join(lock).exists())
        {
            warn!("No lock file found next to {manifest_rel}; installs resolve ranges differently");
        }

        let manifest: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse {manifest_rel}: {e}");
                return Vec::new();
            }
        };

        let mut declared: BTreeMap<String, String> = BTreeMap::new();
        for table in DEPENDENCY_TABLES {
            if let Some(entries) = manifest.get(table).and_then(|v| v.as_object()) {
                for (name, version) in entries {
                    declared.insert(
                        name.clone(),
                        version.as_str().unwrap_or_default().to_string(),
                    );
                }
            }
        }
        if declared.is_empty() {
            return Vec::new();
        }

        let mut items = Vec::new();
        for (name, version) in &declared {
            if is_loose_range(version) {
                items.push(
                    self.risk_item(manifest_rel, LOOSE_RANGE_SIGNAL)
                        .with_meta("dep", name.as_str())
                        .with_meta("version", version.as_str())
                        .with_meta("reason", "loose_range"),
                );
            }
        }

        let used = self.used_packages(ctx.files);
        for name in declared.keys() {
            if !used.contains(name) {
                items.push(
                    self.risk_item(manifest_rel, POSSIBLY_UNUSED_SIGNAL)
                        .with_meta("dep", name.as_str())
                        .with_meta("reason", "possibly_unused"),
                );
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::detectors::file_provider::MockFileProvider;
    use std::path::Path;

    fn run(provider: &MockFileProvider) -> Vec<DebtItem> {
        let config = ScanConfig::default();
        let ctx = RepoContext {
            repo_root: Path::new("/mock/repo"),
            files: provider,
            config: &config,
        };
        DepRiskDetector::new(&config).detect(&ctx)
    }

    #[test]
    fn test_loose_and_unused_both_flagged() {
        let provider = MockFileProvider::new(vec![
            ("package.json", r#"{"dependencies": {"left-pad": "^1.2.3"}}"#),
            ("src/index.ts", "import path from \"path\";\n"),
        ]);
        let items = run(&provider);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind == DebtKind::DepRisk));
        assert!(items.iter().all(|i| i.path == "package.json"));

        let loose = &items[0];
        assert_eq!(loose.meta["reason"], "loose_range");
        assert_eq!(loose.meta["dep"], "left-pad");
        assert_eq!(loose.meta["version"], "^1.2.3");
        assert_eq!(loose.components.deps_outdated, 1.0);

        let unused = &items[1];
        assert_eq!(unused.meta["reason"], "possibly_unused");
        assert_eq!(unused.components.deps_outdated, 0.7);
    }

    #[test]
    fn test_imported_dependency_is_used() {
        let provider = MockFileProvider::new(vec![
            ("package.json", r#"{"dependencies": {"left-pad": "1.2.3"}}"#),
            ("src/index.ts", "import pad from \"left-pad\";\n"),
        ]);
        assert!(run(&provider).is_empty());
    }

    #[test]
    fn test_subpath_and_scoped_imports_normalize() {
        let provider = MockFileProvider::new(vec![
            (
                "package.json",
                r#"{"dependencies": {"lodash": "4.17.21", "@scope/pkg": "2.0.0"}}"#,
            ),
            (
                "src/index.ts",
                "import get from \"lodash/get\";\nconst x = require(\"@scope/pkg/deep/module\");\n",
            ),
        ]);
        assert!(run(&provider).is_empty());
    }

    #[test]
    fn test_all_dependency_tables_scanned() {
        let provider = MockFileProvider::new(vec![(
            "package.json",
            r#"{"devDependencies": {"jest": "~29.0.0"}, "peerDependencies": {"react": "18.x"}}"#,
        )]);
        let items = run(&provider);
        let loose: Vec<_> = items
            .iter()
            .filter(|i| i.meta["reason"] == "loose_range")
            .collect();
        assert_eq!(loose.len(), 2, "~ and x ranges are both loose");
    }

    #[test]
    fn test_relative_imports_ignored() {
        let provider = MockFileProvider::new(vec![
            ("package.json", r#"{"dependencies": {"util": "1.0.0"}}"#),
            ("src/index.ts", "import helper from \"./util\";\n"),
        ]);
        let items = run(&provider);
        // "./util" must not count as using the "util" package
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meta["reason"], "possibly_unused");
    }

    #[test]
    fn test_malformed_manifest_degrades_to_nothing() {
        let provider = MockFileProvider::new(vec![("package.json", "{not json")]);
        assert!(run(&provider).is_empty());
    }

    #[test]
    fn test_top_level_package_normalization() {
        assert_eq!(top_level_package("lodash"), "lodash");
        assert_eq!(top_level_package("lodash/fp/get"), "lodash");
        assert_eq!(top_level_package("@scope/pkg"), "@scope/pkg");
        assert_eq!(top_level_package("@scope/pkg/sub"), "@scope/pkg");
    }
}
