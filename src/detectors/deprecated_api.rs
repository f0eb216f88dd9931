//! Deprecated-API detector
//!
//! Counts occurrences of known-deprecated call patterns across the
//! configured pattern list. Emits one item per file; the `deprecated`
//! component scales linearly with the hit count and saturates at five
//! occurrences.

use crate::config::ScanConfig;
use crate::detectors::base::{FileContext, FileDetector};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::Weights;
use regex::Regex;
use tracing::warn;

/// Hit count at which the deprecated component saturates.
const SATURATION_HITS: f64 = 5.0;

pub struct DeprecatedApiDetector {
    patterns: Vec<Regex>,
    weights: Weights,
    max_file_lines: usize,
}

impl DeprecatedApiDetector {
    pub fn new(config: &ScanConfig) -> Self {
        let patterns = config
            .deprecated
            .patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Skipping invalid deprecated-API pattern {p:?}: {e}");
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

impl FileDetector for DeprecatedApiDetector {
    fn name(&self) -> &'static str {
        "deprecated-api"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem> {
        let hits: usize = self
            .patterns
            .iter()
            .map(|p| p.find_iter(ctx.content).count())
            .sum();
        if hits == 0 {
            return Vec::new();
        }

        let components = ComponentVector {
            deprecated: (hits as f64 / SATURATION_HITS).min(1.0),
            churn: ctx.churn_component(),
            complexity: ctx.complexity_component(self.max_file_lines),
            ..Default::default()
        };
        vec![
            DebtItem::new(ctx.rel_path, DebtKind::Deprecated, components, &self.weights)
                .with_meta("hits", hits),
        ]
    }
}
