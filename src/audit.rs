//! Test coverage auditing across source and test project sets.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::workspace::NamePattern;

/// Name suffix that marks a test project.
pub const TEST_SUFFIX: &str = "-tests";

/// Companion source-project name for a test-project name; names without the
/// suffix pass through unchanged. Only one trailing suffix is stripped.
pub fn source_name(name: &str) -> &str {
    name.strip_suffix(TEST_SUFFIX).unwrap_or(name)
}

/// Gaps between a source project set and a test project set.
///
/// Both lists hold normalized (suffix-stripped) names and are sorted, so
/// output order is deterministic.
#[derive(Debug, Default, Serialize)]
pub struct CoverageReport {
    pub source_total: usize,
    pub test_total: usize,
    pub excluded: usize,
    pub missing: Vec<String>,
    pub orphaned: Vec<String>,
}

impl CoverageReport {
    pub fn has_gaps(&self) -> bool {
        !self.missing.is_empty() || !self.orphaned.is_empty()
    }

    pub fn print(&self) {
        println!(
            "Audited {} source project(s) against {} test project(s)",
            self.source_total, self.test_total
        );
        if self.excluded > 0 {
            println!("  {} source project(s) excluded", self.excluded);
        }

        if !self.has_gaps() {
            println!("{} Every project is covered", "✓".green().bold());
            return;
        }

        for name in &self.missing {
            println!("{} {} has no test project", "✗".red().bold(), name);
        }
        for name in &self.orphaned {
            println!(
                "{} {}{} has no matching source project",
                "⚠".yellow().bold(),
                name,
                TEST_SUFFIX
            );
        }

        println!(
            "\n{} missing, {} orphaned",
            self.missing.len(),
            self.orphaned.len()
        );
    }
}

/// Compute the two-sided coverage gap between source and test project names.
///
/// `missing` is the source names with no suffix-stripped counterpart among
/// the test names, after dropping sources matching `exclude`; `orphaned` is
/// the suffix-stripped test names with no source counterpart. Comparison is
/// exact and case-sensitive.
pub fn audit(
    source_names: &[String],
    test_names: &[String],
    exclude: Option<&NamePattern>,
) -> CoverageReport {
    let sources: BTreeSet<&str> = source_names.iter().map(String::as_str).collect();
    let stripped: BTreeSet<&str> = test_names.iter().map(|n| source_name(n)).collect();

    let mut excluded = 0;
    let mut missing = Vec::new();
    for name in &sources {
        if let Some(pattern) = exclude {
            if pattern.matches(name) {
                excluded += 1;
                continue;
            }
        }
        if !stripped.contains(name) {
            missing.push(name.to_string());
        }
    }

    let orphaned: Vec<String> = stripped
        .iter()
        .filter(|n| !sources.contains(*n))
        .map(|n| n.to_string())
        .collect();

    CoverageReport {
        source_total: sources.len(),
        test_total: test_names.len(),
        excluded,
        missing,
        orphaned,
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
