//! Scan configuration
//!
//! Loads per-repository configuration from `debtscan.toml` in the
//! repository root and merges it over built-in defaults. Configuration
//! tunes the scoring weights, detector pattern lists, test-file
//! conventions, dependency-manifest names, the complexity ceiling, and
//! exclude globs.
//!
//! A missing file yields the defaults; a malformed file also yields the
//! defaults (with a warning). Configuration problems never fail a scan.

use crate::scoring::Weights;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the per-repository configuration file.
pub const CONFIG_FILE: &str = "debtscan.toml";

/// Full scan configuration, merged over built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub weights: Weights,

    #[serde(default)]
    pub markers: MarkerConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub deprecated: DeprecatedConfig,

    #[serde(default)]
    pub generated: GeneratedConfig,

    #[serde(default)]
    pub tests: TestConventionConfig,

    #[serde(default)]
    pub dependencies: DependencyConfig,

    #[serde(default)]
    pub complexity: ComplexityConfig,

    /// Glob patterns excluded from the scan, in addition to ignore-file
    /// rules. Overriding this key replaces the default list.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            markers: MarkerConfig::default(),
            lint: LintConfig::default(),
            deprecated: DeprecatedConfig::default(),
            generated: GeneratedConfig::default(),
            tests: TestConventionConfig::default(),
            dependencies: DependencyConfig::default(),
            complexity: ComplexityConfig::default(),
            exclude: default_exclude(),
        }
    }
}

/// Inline-marker detector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerConfig {
    /// Case-sensitive keywords that open a marker comment.
    #[serde(default = "default_marker_keywords")]
    pub keywords: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            keywords: default_marker_keywords(),
        }
    }
}

/// Lint-suppression detector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    /// Regex patterns signaling a suppressed linter warning.
    #[serde(default = "default_lint_patterns")]
    pub patterns: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            patterns: default_lint_patterns(),
        }
    }
}

/// Deprecated-API detector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeprecatedConfig {
    /// Regex patterns for known-deprecated call sites.
    #[serde(default = "default_deprecated_patterns")]
    pub patterns: Vec<String>,
}

impl Default for DeprecatedConfig {
    fn default() -> Self {
        Self {
            patterns: default_deprecated_patterns(),
        }
    }
}

/// Generated-artifact detector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedConfig {
    /// Path prefixes treated as build output.
    #[serde(default = "default_build_output_prefixes")]
    pub build_output_prefixes: Vec<String>,

    /// File-name suffixes treated as minified artifacts.
    #[serde(default = "default_minified_suffixes")]
    pub minified_suffixes: Vec<String>,
}

impl Default for GeneratedConfig {
    fn default() -> Self {
        Self {
            build_output_prefixes: default_build_output_prefixes(),
            minified_suffixes: default_minified_suffixes(),
        }
    }
}

/// Test-file convention globs for the test-gap detector.
#[derive(Debug, Clone, Deserialize)]
pub struct TestConventionConfig {
    #[serde(default = "default_src_globs")]
    pub src_globs: Vec<String>,

    #[serde(default = "default_test_globs")]
    pub test_globs: Vec<String>,
}

impl Default for TestConventionConfig {
    fn default() -> Self {
        Self {
            src_globs: default_src_globs(),
            test_globs: default_test_globs(),
        }
    }
}

/// Dependency-manifest configuration for the dependency-risk detector.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyConfig {
    /// Manifest file name, relative to the repository root.
    #[serde(default = "default_package_file")]
    pub package_file: String,

    /// Lock-file names; absence of all of them is reported as a warning.
    #[serde(default = "default_lock_files")]
    pub lock_files: Vec<String>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            package_file: default_package_file(),
            lock_files: default_lock_files(),
        }
    }
}

/// Complexity normalization ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplexityConfig {
    /// Non-blank line count at which the complexity component saturates.
    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: usize,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            max_file_lines: default_max_file_lines(),
        }
    }
}

fn default_marker_keywords() -> Vec<String> {
    ["TODO", "FIXME", "HACK", "XXX", "BUG", "OPTIMIZE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_lint_patterns() -> Vec<String> {
    [
        r"eslint-disable",
        r"#\s*noqa",
        r"@ts-ignore",
        r"#\s*type:\s*ignore",
        r"@SuppressWarnings",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_deprecated_patterns() -> Vec<String> {
    [
        r"\bfs\.rmdir\b",
        r"\bnew\s+Buffer\s*\(",
        r"\basyncio\.get_event_loop\s*\(",
        r"\blogging\.warn\s*\(",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_build_output_prefixes() -> Vec<String> {
    vec!["dist/".to_string()]
}

fn default_minified_suffixes() -> Vec<String> {
    vec![".min.js".to_string()]
}

fn default_src_globs() -> Vec<String> {
    vec!["src/**/*.ts".to_string(), "app/**/*.py".to_string()]
}

fn default_test_globs() -> Vec<String> {
    vec!["**/*.test.ts".to_string(), "tests/**/*.py".to_string()]
}

fn default_package_file() -> String {
    "package.json".to_string()
}

fn default_lock_files() -> Vec<String> {
    vec![
        "package-lock.json".to_string(),
        "pnpm-lock.yaml".to_string(),
        "yarn.lock".to_string(),
    ]
}

fn default_max_file_lines() -> usize {
    1000
}

fn default_exclude() -> Vec<String> {
    vec![
        "dist/**".to_string(),
        "vendor/**".to_string(),
        "**/*.min.js".to_string(),
    ]
}

/// Load configuration from the repository root, falling back to defaults.
pub fn load_config(repo_root: &Path) -> ScanConfig {
    let path = repo_root.join(CONFIG_FILE);
    if !path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE);
        return ScanConfig::default();
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return ScanConfig::default();
        }
    };

    match toml::from_str(&content) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to parse {}: {} (using defaults)", path.display(), e);
            ScanConfig::default()
        }
    }
}

/// Glob matching for exclude patterns and test-convention globs.
///
/// Supports the pattern shapes the configuration uses:
/// `dir/**`, `**/name/**`, `**/*.ext`, `dir/**/*.ext`, `dir/*.ext`, and
/// literal paths (which also match as directory prefixes).
pub fn glob_match(pattern: &str, path: &str) -> bool {
    // **/X/**: path contains X as a directory segment
    if let Some(middle) = pattern
        .strip_prefix("**/")
        .and_then(|p| p.strip_suffix("/**"))
    {
        return path.starts_with(&format!("{middle}/")) || path.contains(&format!("/{middle}/"));
    }

    // prefix/**/suffix: anchored prefix, any depth, suffix with optional *
    if let Some((prefix, suffix)) = pattern.split_once("**") {
        let suffix = suffix.trim_start_matches('/');
        if !prefix.is_empty() && !path.starts_with(prefix) {
            return false;
        }
        return suffix_matches(suffix, path);
    }

    // Single-star pattern within one segment
    if let Some((prefix, suffix)) = pattern.split_once('*') {
        return path.starts_with(prefix)
            && path.ends_with(suffix)
            && path.len() >= prefix.len() + suffix.len();
    }

    // Literal: exact file or directory prefix
    path == pattern || path.starts_with(&format!("{pattern}/"))
}

fn suffix_matches(suffix: &str, path: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }
    match suffix.split_once('*') {
        None => path.ends_with(suffix),
        Some((before, after)) => {
            if before.is_empty() {
                path.ends_with(after)
            } else {
                path.contains(before) && path.ends_with(after)
            }
        }
    }
}
