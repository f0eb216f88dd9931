//! Weighted scoring model
//!
//! Combines a fixed-width component vector into a single severity score:
//!
//! ```text
//! s     = Σ weight(k) · component(k)
//! score = round2(100 / (1 + e^-s))
//! ```
//!
//! The logistic squash keeps scores bounded and monotonic: an all-zero
//! vector lands exactly on 50.00, a single strong signal pushes well
//! above the midpoint, and stacked signals saturate toward 100 instead of
//! compounding without bound. Non-linearity lives here, once, globally;
//! per-signal normalization stays a plain linear clamp so individual
//! components remain cheap to reason about.
//!
//! Bucket thresholds are fixed at 40 and 70 (P3 / P2 / P1). They are not
//! user-configurable; exposing them later only requires threading two
//! numbers through [`bucket`].

use crate::models::{Component, ComponentVector};
use serde::Deserialize;

/// Per-component multipliers applied before the logistic squash.
///
/// A total function over the component vocabulary: every field carries a
/// built-in default, and unrecognized keys in user configuration are
/// ignored during deserialization rather than raising an error, so a typo
/// in a config file can never fail a scan.
#[derive(Debug, Clone, Deserialize)]
pub struct Weights {
    #[serde(default = "default_inline_priority")]
    pub inline_priority: f64,
    #[serde(default = "default_age_days")]
    pub age_days: f64,
    #[serde(default = "default_churn")]
    pub churn: f64,
    #[serde(default = "default_complexity")]
    pub complexity: f64,
    #[serde(default = "default_deps_outdated")]
    pub deps_outdated: f64,
    #[serde(default = "default_no_tests")]
    pub no_tests: f64,
    #[serde(default = "default_lint_suppress")]
    pub lint_suppress: f64,
    #[serde(default = "default_deprecated")]
    pub deprecated: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            inline_priority: default_inline_priority(),
            age_days: default_age_days(),
            churn: default_churn(),
            complexity: default_complexity(),
            deps_outdated: default_deps_outdated(),
            no_tests: default_no_tests(),
            lint_suppress: default_lint_suppress(),
            deprecated: default_deprecated(),
        }
    }
}

fn default_inline_priority() -> f64 {
    1.0
}
fn default_age_days() -> f64 {
    0.6
}
fn default_churn() -> f64 {
    0.6
}
fn default_complexity() -> f64 {
    0.7
}
fn default_deps_outdated() -> f64 {
    0.8
}
fn default_no_tests() -> f64 {
    0.8
}
fn default_lint_suppress() -> f64 {
    0.5
}
fn default_deprecated() -> f64 {
    0.7
}

impl Weights {
    pub fn weight(&self, component: Component) -> f64 {
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
}

/// Linear clamp of a raw measurement onto [0, 1].
///
/// Returns 0.0 when `max` is non-positive: a missing ceiling means
/// "no signal", not an error.
pub fn normalize(raw: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (raw / max).clamp(0.0, 1.0)
}

/// Weighted logistic combination of a component vector, in [0, 100].
pub fn compute_score(components: &ComponentVector, weights: &Weights) -> f64 {
    let s: f64 = components
        .iter()
        .map(|(component, value)| weights.weight(component) * value)
        .sum();
    round2(100.0 / (1.0 + (-s).exp()))
}

/// Coarse priority bucket for a score. Total over [0, 100].
pub fn bucket(score: f64) -> &'static str {
    if score >= 70.0 {
        "P1"
    } else if score >= 40.0 {
        "P2"
    } else {
        "P3"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_scores_midpoint() {
        let zero = ComponentVector::default();
        assert_eq!(compute_score(&zero, &Weights::default()), 50.0);

        // Regardless of weights: zero components zero out every term.
        let heavy = Weights {
            inline_priority: 10.0,
            age_days: 10.0,
            churn: 10.0,
            complexity: 10.0,
            deps_outdated: 10.0,
            no_tests: 10.0,
            lint_suppress: 10.0,
            deprecated: 10.0,
        };
        assert_eq!(compute_score(&zero, &heavy), 50.0);
    }

    #[test]
    fn test_score_bounded_and_monotonic() {
        let weights = Weights::default();
        let mut previous = 0.0;
        for step in 0..=10 {
            let value = step as f64 / 10.0;
            let components = ComponentVector {
                no_tests: value,
                ..Default::default()
            };
            let score = compute_score(&components, &weights);
            assert!((0.0..=100.0).contains(&score));
            assert!(
                score >= previous,
                "score must not decrease as a component grows"
            );
            previous = score;
        }
    }

    #[test]
    fn test_single_strong_signal_beats_midpoint() {
        let components = ComponentVector {
            deps_outdated: 1.0,
            ..Default::default()
        };
        let score = compute_score(&components, &Weights::default());
        assert!(score > 50.0);
    }

    #[test]
    fn test_stacked_signals_saturate() {
        let all_high = ComponentVector {
            inline_priority: 1.0,
            age_days: 1.0,
            churn: 1.0,
            complexity: 1.0,
            deps_outdated: 1.0,
            no_tests: 1.0,
            lint_suppress: 1.0,
            deprecated: 1.0,
        };
        let score = compute_score(&all_high, &Weights::default());
        assert!(score > 90.0 && score <= 100.0);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let components = ComponentVector {
            churn: 0.37,
            ..Default::default()
        };
        let score = compute_score(&components, &Weights::default());
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }

    #[test]
    fn test_normalize_edges() {
        assert_eq!(normalize(5.0, 0.0), 0.0);
        assert_eq!(normalize(5.0, -1.0), 0.0);
        assert_eq!(normalize(10.0, 5.0), 1.0);
        assert_eq!(normalize(5.0, 5.0), 1.0);
        assert_eq!(normalize(1.0, 4.0), 0.25);
        assert_eq!(normalize(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_bucket_partitions() {
        assert_eq!(bucket(0.0), "P3");
        assert_eq!(bucket(39.99), "P3");
        assert_eq!(bucket(40.0), "P2");
        assert_eq!(bucket(69.99), "P2");
        assert_eq!(bucket(70.0), "P1");
        assert_eq!(bucket(100.0), "P1");
    }

    #[test]
    fn test_unknown_config_keys_ignored() {
        // A typo'd component in user config must not fail, and known
        // overrides must land.
        let weights: Weights =
            toml::from_str("churn = 0.9\ntpyo_component = 3.0").expect("deserialize weights");
        assert_eq!(weights.churn, 0.9);
        assert_eq!(weights.inline_priority, 1.0);
    }
}
