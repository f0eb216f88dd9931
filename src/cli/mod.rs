//! CLI command definitions and handlers

mod init;

use crate::config;
use crate::reporters;
use crate::scanner::{find_repo_root, Scanner, DEFAULT_MAX_ITEMS, DEFAULT_SINCE_DAYS};
use crate::scoring::bucket;
use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// debtscan - technical-debt inventory
///
/// 100% LOCAL - no data leaves your machine.
#[derive(Parser, Debug)]
#[command(name = "debtscan")]
#[command(
    version,
    about = "Scan a repository and rank its technical debt",
    long_about = "debtscan walks a repository, extracts debt signals (inline markers, lint \
suppressions, deprecated APIs, dependency risks, config drift, test gaps), and ranks every \
item with a configurable weighted scoring model.",
    after_help = "\
Examples:
  debtscan scan .                          Print a ranked summary
  debtscan scan . --markdown --json        Also write TECH_DEBT.md and tech-debt.json
  debtscan scan . --since-days 90          Widen the churn lookback window
  debtscan scan . --issues --owner alice   Open an umbrella GitHub issue via gh
  debtscan scan . --fail-on p1             Exit 1 when any P1 item exists (CI mode)
  debtscan init                            Write a commented debtscan.toml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a repository and rank detected debt items
    Scan {
        /// Path to the repository (or any child path)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write TECH_DEBT.md into the repository root
        #[arg(long)]
        markdown: bool,

        /// Write tech-debt.json into the repository root
        #[arg(long)]
        json: bool,

        /// Create a single umbrella GitHub issue via `gh`
        #[arg(long)]
        issues: bool,

        /// GitHub username the umbrella issue is assigned to
        #[arg(long)]
        owner: Option<String>,

        /// Git churn lookback window, in days
        #[arg(long, default_value_t = DEFAULT_SINCE_DAYS)]
        since_days: u32,

        /// Safety cap on the number of reported items
        #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
        max_items: usize,

        /// Exit non-zero when any item reaches this bucket
        #[arg(long, value_parser = ["p1", "p2"])]
        fail_on: Option<String>,
    },

    /// Write a commented example debtscan.toml
    Init {
        /// Directory receiving the config file
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            path,
            markdown,
            json,
            issues,
            owner,
            since_days,
            max_items,
            fail_on,
        } => run_scan(ScanArgs {
            path,
            markdown,
            json,
            issues,
            owner,
            since_days,
            max_items,
            fail_on,
        }),
        Commands::Init { path } => init::run(&path),
    }
}

struct ScanArgs {
    path: PathBuf,
    markdown: bool,
    json: bool,
    issues: bool,
    owner: Option<String>,
    since_days: u32,
    max_items: usize,
    fail_on: Option<String>,
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let repo_root = find_repo_root(&args.path);
    let config = config::load_config(&repo_root);
    let scanner = Scanner::new(repo_root.clone(), config)
        .with_since_days(args.since_days)
        .with_max_items(args.max_items);

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let result = scanner.scan_with_progress(Some(&|done, total| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
    }));
    bar.finish_and_clear();

    println!(
        "{}Scanned {} — {} items, avg score {:.2}",
        style("✓ ").green(),
        style(repo_root.display()).cyan(),
        style(result.summary.count).cyan(),
        result.summary.avg_score
    );
    for (kind, count) in &result.summary.by_kind {
        println!("  {kind:<20} {count}");
    }

    if args.json {
        let path = reporters::json::write(&result, &repo_root)?;
        println!("Wrote {}", style(path.display()).cyan());
    }
    if args.markdown {
        let path = reporters::markdown::write(&result, &repo_root)?;
        println!("Wrote {}", style(path.display()).cyan());
    }
    if args.issues {
        match reporters::issues::create_umbrella_issue(&result, &repo_root, args.owner.as_deref())
        {
            Ok(out) if !out.is_empty() => println!("{out}"),
            Ok(_) => println!("gh issue create: no output (check auth/repo visibility)"),
            Err(e) => println!(
                "{}Failed to create GitHub issue: {e}",
                style("warn: ").yellow()
            ),
        }
    }

    if let Some(threshold) = args.fail_on {
        let tripped = result.items.iter().any(|item| {
            let item_bucket = bucket(item.score);
            item_bucket == "P1" || (threshold == "p2" && item_bucket == "P2")
        });
        if tripped {
            println!(
                "{}items at or above {} found",
                style("✗ ").red(),
                threshold.to_uppercase()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["debtscan", "scan", "."]).expect("parse");
        let Commands::Scan {
            since_days,
            max_items,
            markdown,
            fail_on,
            ..
        } = cli.command
        else {
            panic!("expected scan subcommand");
        };
        assert_eq!(since_days, DEFAULT_SINCE_DAYS);
        assert_eq!(max_items, DEFAULT_MAX_ITEMS);
        assert!(!markdown);
        assert!(fail_on.is_none());
    }

    #[test]
    fn test_fail_on_rejects_unknown_bucket() {
        assert!(Cli::try_parse_from(["debtscan", "scan", ".", "--fail-on", "p9"]).is_err());
    }
}
