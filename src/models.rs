//! Core data models for debtscan
//!
//! These models represent detected debt items, their normalized component
//! vectors, and the aggregate scan result. The serialized shape of
//! [`ScanResult`] is the contract consumed by the report renderers and the
//! JSON writer.

use crate::scoring::{bucket, compute_score, Weights};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The fixed tag set of debt signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    InlineMarker,
    LintSuppress,
    Deprecated,
    GeneratedArtifact,
    ConfigDrift,
    DepRisk,
    TestGap,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtKind::InlineMarker => "inline_marker",
            DebtKind::LintSuppress => "lint_suppress",
            DebtKind::Deprecated => "deprecated",
            DebtKind::GeneratedArtifact => "generated_artifact",
            DebtKind::ConfigDrift => "config_drift",
            DebtKind::DepRisk => "dep_risk",
            DebtKind::TestGap => "test_gap",
        }
    }
}

impl std::fmt::Display for DebtKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dimension of the component vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    InlinePriority,
    AgeDays,
    Churn,
    Complexity,
    DepsOutdated,
    NoTests,
    LintSuppress,
    Deprecated,
}

impl Component {
    /// The full component vocabulary, in serialization order.
    pub const ALL: [Component; 8] = [
        Component::InlinePriority,
        Component::AgeDays,
        Component::Churn,
        Component::Complexity,
        Component::DepsOutdated,
        Component::NoTests,
        Component::LintSuppress,
        Component::Deprecated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::InlinePriority => "inline_priority",
            Component::AgeDays => "age_days",
            Component::Churn => "churn",
            Component::Complexity => "complexity",
            Component::DepsOutdated => "deps_outdated",
            Component::NoTests => "no_tests",
            Component::LintSuppress => "lint_suppress",
            Component::Deprecated => "deprecated",
        }
    }
}

/// Fixed-width vector of normalized signal strengths in [0, 1].
///
/// Every dimension is always present; a detector leaves the dimensions
/// that do not apply to its signal at 0.0. Using named fields instead of
/// a map makes "all components present" a compile-time guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentVector {
    #[serde(default)]
    pub inline_priority: f64,
    #[serde(default)]
    pub age_days: f64,
    #[serde(default)]
    pub churn: f64,
    #[serde(default)]
    pub complexity: f64,
    #[serde(default)]
    pub deps_outdated: f64,
    #[serde(default)]
    pub no_tests: f64,
    #[serde(default)]
    pub lint_suppress: f64,
    #[serde(default)]
    pub deprecated: f64,
}

impl ComponentVector {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::InlinePriority => self.inline_priority,
            Component::AgeDays => self.age_days,
            Component::Churn => self.churn,
            Component::Complexity => self.complexity,
            Component::DepsOutdated => self.deps_outdated,
            Component::NoTests => self.no_tests,
            Component::LintSuppress => self.lint_suppress,
            Component::Deprecated => self.deprecated,
        }
    }

    /// Iterate over every dimension, including zero-valued ones.
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// One detected unit of technical debt.
///
/// Immutable once appended to the result set: the score is computed from
/// the component vector at construction and never mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct DebtItem {
    /// Repository-relative path (or a synthetic manifest path for
    /// repo-wide signals).
    pub path: String,
    pub kind: DebtKind,
    /// Severity in [0, 100], rounded to 2 decimals.
    pub score: f64,
    /// Kind-specific auxiliary details. Not used by scoring.
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub status: String,
    #[serde(skip)]
    pub components: ComponentVector,
}

impl DebtItem {
    /// Build an item, computing its score from the component vector.
    pub fn new(
        path: impl Into<String>,
        kind: DebtKind,
        components: ComponentVector,
        weights: &Weights,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            score: compute_score(&components, weights),
            meta: Map::new(),
            owner: None,
            priority: None,
            status: "open".to_string(),
            components,
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = priority;
        self
    }
}

/// Summary statistics over the ranked, capped item list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub count: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub avg_score: f64,
}

impl ScanSummary {
    pub fn from_items(items: &[DebtItem]) -> Self {
        let mut summary = Self {
            count: items.len(),
            ..Self::default()
        };
        if items.is_empty() {
            return summary;
        }
        let mut total = 0.0;
        for item in items {
            *summary
                .by_kind
                .entry(item.kind.as_str().to_string())
                .or_insert(0) += 1;
            total += item.score;
        }
        summary.avg_score = (total / items.len() as f64 * 100.0).round() / 100.0;
        summary
    }
}

/// The aggregate output of one scan. Created once per invocation,
/// immutable, never merged with prior results.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub repo_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    pub summary: ScanSummary,
    pub items: Vec<DebtItem>,
}

impl ScanResult {
    /// Finalize a ranked, capped item list into the output contract.
    ///
    /// Each item's component vector and priority bucket are folded into
    /// its `meta` so the serialized item shape is exactly
    /// `{path, kind, score, meta, owner, status}` (plus `priority` when
    /// inferred).
    pub fn new(repo_root: String, commit_sha: Option<String>, mut items: Vec<DebtItem>) -> Self {
        for item in &mut items {
            item.meta.insert(
                "components".to_string(),
                serde_json::to_value(item.components).unwrap_or(Value::Null),
            );
            item.meta.insert(
                "priority_bucket".to_string(),
                Value::String(bucket(item.score).to_string()),
            );
        }
        let summary = ScanSummary::from_items(&items);
        Self {
            repo_root,
            commit_sha,
            summary,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_vector_always_complete() {
        let vector = ComponentVector {
            churn: 0.5,
            ..Default::default()
        };
        let dims: Vec<_> = vector.iter().collect();
        assert_eq!(dims.len(), Component::ALL.len());
        assert_eq!(vector.get(Component::Churn), 0.5);
        assert_eq!(vector.get(Component::NoTests), 0.0);
    }

    #[test]
    fn test_component_serialization_keys() {
        let value = serde_json::to_value(ComponentVector::default()).expect("serialize");
        let map = value.as_object().expect("object");
        for component in Component::ALL {
            assert!(
                map.contains_key(component.as_str()),
                "missing component key {}",
                component.as_str()
            );
        }
    }

    #[test]
    fn test_summary_from_items() {
        let weights = Weights::default();
        let items = vec![
            DebtItem::new("a.ts", DebtKind::InlineMarker, ComponentVector::default(), &weights),
            DebtItem::new("b.ts", DebtKind::InlineMarker, ComponentVector::default(), &weights),
            DebtItem::new("package.json", DebtKind::DepRisk, ComponentVector::default(), &weights),
        ];
        let summary = ScanSummary::from_items(&items);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.by_kind["inline_marker"], 2);
        assert_eq!(summary.by_kind["dep_risk"], 1);
        // All-zero vectors score exactly 50.00
        assert_eq!(summary.avg_score, 50.0);
    }

    #[test]
    fn test_summary_empty() {
        let summary = ScanSummary::from_items(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_score, 0.0);
        assert!(summary.by_kind.is_empty());
    }

    #[test]
    fn test_result_embeds_components_and_bucket() {
        let weights = Weights::default();
        let item = DebtItem::new(
            "src/a.ts",
            DebtKind::LintSuppress,
            ComponentVector {
                lint_suppress: 1.0,
                ..Default::default()
            },
            &weights,
        );
        let result = ScanResult::new("/repo".to_string(), None, vec![item]);
        let meta = &result.items[0].meta;
        assert!(meta.contains_key("components"));
        assert_eq!(meta["components"]["lint_suppress"], 1.0);
        let bucket = meta["priority_bucket"].as_str().expect("bucket string");
        assert!(matches!(bucket, "P1" | "P2" | "P3"));
    }
}
