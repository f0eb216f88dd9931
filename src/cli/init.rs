//! Init command - write a commented example configuration

use crate::config::CONFIG_FILE;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const EXAMPLE_CONFIG: &str = r#"# debtscan configuration
# Every key is optional; anything omitted keeps its built-in default.

# Globs excluded from the scan, in addition to ignore-file rules.
# exclude = ["dist/**", "vendor/**", "**/*.min.js"]

[weights]
# Per-component multipliers applied before the logistic squash.
# inline_priority = 1.0
# age_days = 0.6
# churn = 0.6
# complexity = 0.7
# deps_outdated = 0.8
# no_tests = 0.8
# lint_suppress = 0.5
# deprecated = 0.7

[markers]
# Case-sensitive inline marker keywords.
# keywords = ["TODO", "FIXME", "HACK", "XXX", "BUG", "OPTIMIZE"]

[tests]
# Source files expected to have tests, and where tests live.
# src_globs = ["src/**/*.ts", "app/**/*.py"]
# test_globs = ["**/*.test.ts", "tests/**/*.py"]

[dependencies]
# package_file = "package.json"
# lock_files = ["package-lock.json", "pnpm-lock.yaml", "yarn.lock"]

[complexity]
# Non-blank line count at which the complexity component saturates.
# max_file_lines = 1000
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} {} already exists",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}
