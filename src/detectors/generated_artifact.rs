//! Generated-artifact detector
//!
//! Flags files under a build-output path convention or matching a
//! minified-file naming convention. These inflate the repository without
//! being organic debt, so only the size-derived complexity component is
//! populated; age and churn stay zero for machine-written output.

use crate::config::ScanConfig;
use crate::detectors::base::{FileContext, FileDetector};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::Weights;

pub struct GeneratedArtifactDetector {
    build_output_prefixes: Vec<String>,
    minified_suffixes: Vec<String>,
    weights: Weights,
    max_file_lines: usize,
}

impl GeneratedArtifactDetector {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            build_output_prefixes: config.generated.build_output_prefixes.clone(),
            minified_suffixes: config.generated.minified_suffixes.clone(),
            weights: config.weights.clone(),
            max_file_lines: config.complexity.max_file_lines,
        }
    }

    fn classify(&self, rel_path: &str) -> Option<&'static str> {
        if self
            .build_output_prefixes
            .iter()
            .any(|prefix| rel_path.starts_with(prefix.as_str()))
        {
            return Some("build_output");
        }
        let base = rel_path.rsplit('/').next().unwrap_or(rel_path).to_lowercase();
        if self
            .minified_suffixes
            .iter()
            .any(|suffix| base.ends_with(suffix.as_str()))
        {
            return Some("minified");
        }
        None
    }
}

impl FileDetector for GeneratedArtifactDetector {
    fn name(&self) -> &'static str {
        "generated-artifact"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem> {
        let Some(reason) = self.classify(ctx.rel_path) else {
            return Vec::new();
        };

        let components = ComponentVector {
            complexity: ctx.complexity_component(self.max_file_lines),
            ..Default::default()
        };
        vec![
            DebtItem::new(ctx.rel_path, DebtKind::GeneratedArtifact, components, &self.weights)
                .with_meta("reason", reason),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::base::test_context;

    fn detector() -> GeneratedArtifactDetector {
        GeneratedArtifactDetector::new(&ScanConfig::default())
    }

    #[test]
    fn test_flags_build_output() {
        let ctx = test_context("dist/bundle.js", "var a=1;\n");
        let items = detector().detect(&ctx);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meta["reason"], "build_output");
        assert_eq!(items[0].components.churn, 0.0);
        assert_eq!(items[0].components.age_days, 0.0);
    }

    #[test]
    fn test_flags_minified_names_anywhere() {
        let ctx = test_context("static/js/APP.MIN.JS", "var a=1;\n");
        let items = detector().detect(&ctx);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meta["reason"], "minified");
    }

    #[test]
    fn test_ignores_source_files() {
        let ctx = test_context("src/bundle.js", "var a=1;\n");
        assert!(detector().detect(&ctx).is_empty());
    }
}
