//! Inline marker detector
//!
//! Scans file text for TODO/FIXME-style markers. Each regex match is one
//! item; the matched text is kept (truncated) for reporting, and an owner
//! handle plus a priority tag are extracted from it when present.

use crate::config::ScanConfig;
use crate::detectors::base::{FileContext, FileDetector, AGE_CEILING_DAYS};
use crate::models::{ComponentVector, DebtItem, DebtKind};
use crate::scoring::{normalize, Weights};
use regex::Regex;
use std::sync::OnceLock;

/// Matched marker text is truncated to this many characters in reports.
const SNIPPET_MAX_CHARS: usize = 240;

static OWNER_PATTERN: OnceLock<Regex> = OnceLock::new();
static PRIORITY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn owner_pattern() -> &'static Regex {
    OWNER_PATTERN.get_or_init(|| Regex::new(r"(?i)@([a-z0-9_-]+)").expect("valid regex"))
}

fn priority_pattern() -> &'static Regex {
    PRIORITY_PATTERN.get_or_init(|| Regex::new(r"(?i)\[(P\d)\]").expect("valid regex"))
}

pub struct InlineMarkerDetector {
    pattern: Regex,
    weights: Weights,
    max_file_lines: usize,
}

impl InlineMarkerDetector {
    pub fn new(config: &ScanConfig) -> Self {
        let alternation = config
            .markers
            .keywords
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|");
        // Case-sensitive on purpose: marker keywords flag work, lowercase
        // prose ("todo lists are nice") does not.
        let pattern =
            Regex::new(&format!(r"({alternation}).*")).expect("escaped keywords form a valid regex");
        Self {
            pattern,
            weights: config.weights.clone(),
            max_file_lines: config.complexity.max_file_lines,
        }
    }
}

impl FileDetector for InlineMarkerDetector {
    fn name(&self) -> &'static str {
        "inline-marker"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<DebtItem> {
        let mut matches = Vec::new();
        for (idx, line) in ctx.content.lines().enumerate() {
            for m in self.pattern.find_iter(line) {
                let snippet: String = m.as_str().chars().take(SNIPPET_MAX_CHARS).collect();
                matches.push((idx + 1, snippet));
            }
        }
        if matches.is_empty() {
            return Vec::new();
        }

        // One history lookup per file, shared by every match in it.
        let age_days = ctx
            .age_days()
            .map(|days| normalize(days, AGE_CEILING_DAYS))
            .unwrap_or(0.0);
        let churn = ctx.churn_component();
        let complexity = ctx.complexity_component(self.max_file_lines);

        matches
            .into_iter()
            .map(|(line_no, snippet)| {
                let owner = owner_pattern()
                    .captures(&snippet)
                    .map(|caps| caps[1].to_string());
                let priority = priority_pattern()
                    .captures(&snippet)
                    .map(|caps| caps[1].to_uppercase());
                let inline_priority = match priority.as_deref() {
                    Some("P1") => 1.0,
                    Some(_) => 0.5,
                    None => 0.2,
                };
                let components = ComponentVector {
                    inline_priority,
                    age_days,
                    churn,
                    complexity,
                    ..Default::default()
                };
                DebtItem::new(ctx.rel_path, DebtKind::InlineMarker, components, &self.weights)
                    .with_meta("line", line_no)
                    .with_meta("snippet", snippet)
                    .with_owner(owner)
                    .with_priority(priority)
            })
            .collect()
    }
}
