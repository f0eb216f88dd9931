//! debtscan - Technical-debt inventory CLI
//!
//! A fast, local-first scanner that walks a repository, extracts
//! heterogeneous debt signals (inline markers, lint suppressions,
//! deprecated API usage, dependency risks, configuration drift, test
//! gaps), normalizes them into a fixed-width component vector, and ranks
//! every item with a configurable weighted scoring model.

pub mod cli;
pub mod config;
pub mod detectors;
pub mod git;
pub mod models;
pub mod reporters;
pub mod scanner;
pub mod scoring;
