//! Debt signal detectors
//!
//! Each detector is a pure function of its inputs producing zero or more
//! [`DebtItem`]s with a fully-populated component vector. Detection runs
//! in two passes:
//!
//! - file-local detectors (markers, suppressions, deprecated APIs,
//!   generated artifacts, config drift) see every eligible file exactly
//!   once;
//! - repo-wide detectors (dependency risk, test gaps) run once against
//!   the full file set and manifest.
//!
//! Detectors share no mutable state, so the per-file pass parallelizes
//! safely across files.

mod base;
pub mod file_provider;

mod config_drift;
mod dep_risk;
mod deprecated_api;
mod generated_artifact;
mod inline_marker;
mod lint_suppress;
mod test_gap;

pub use base::{
    count_loc, FileContext, FileDetector, RepoContext, RepoDetector, AGE_CEILING_DAYS,
    CHURN_CEILING_LINES,
};

#[cfg(test)]
pub use base::test_context;

pub use config_drift::ConfigDriftDetector;
pub use dep_risk::DepRiskDetector;
pub use deprecated_api::DeprecatedApiDetector;
pub use generated_artifact::GeneratedArtifactDetector;
pub use inline_marker::InlineMarkerDetector;
pub use lint_suppress::LintSuppressDetector;
pub use test_gap::TestGapDetector;

use crate::config::ScanConfig;

/// File-local detectors in their fixed emission order.
///
/// The order is part of the determinism contract: score ties in the final
/// ranking preserve it.
pub fn file_detectors(config: &ScanConfig) -> Vec<Box<dyn FileDetector>> {
    vec![
        Box::new(InlineMarkerDetector::new(config)),
        Box::new(LintSuppressDetector::new(config)),
        Box::new(DeprecatedApiDetector::new(config)),
        Box::new(GeneratedArtifactDetector::new(config)),
        Box::new(ConfigDriftDetector::new(config)),
    ]
}

/// Repo-wide detectors for the second pass, in fixed order.
pub fn repo_detectors(config: &ScanConfig) -> Vec<Box<dyn RepoDetector>> {
    vec![
        Box::new(DepRiskDetector::new(config)),
        Box::new(TestGapDetector::new(config)),
    ]
}
