//! debtscan - Technical-debt inventory CLI
//!
//! Scans a repository snapshot plus a bounded git-history window and
//! produces a ranked inventory of technical-debt items.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = debtscan::cli::Cli::parse();
    debtscan::cli::run(cli)
}
