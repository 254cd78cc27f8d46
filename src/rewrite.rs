//! Reference path rewriting.
//!
//! Rewrites path references that point at sibling directories so they point
//! into a relocated source tree instead, e.g. `../foo` becoming
//! `../../private-repo/src/foo`.

use anyhow::Result;
use colored::Colorize;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use crate::manifest::ProjectManifest;
use crate::workspace::{ItemFailure, NamePattern, WorkspaceScanner};

/// Default pattern: paths that start with a parent-directory traversal.
pub const SIBLING_PATTERN: &str = r"^\.\.[/\\]";

/// A prefix-rewrite rule for reference paths.
///
/// The marker substring doubles as the idempotence guard: entries whose path
/// already contains it are never touched, so applying the same rule twice is
/// a no-op. The guard is only as good as the current rule: if the
/// replacement convention changes later, entries carrying the old marker
/// become eligible for rewriting again.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    marker: String,
    replacement_prefix: String,
}

impl RewriteRule {
    /// Create a rule. Rejects replacements that do not contain the marker,
    /// since such a rule would re-match its own output on the next run.
    pub fn new(pattern: &str, marker: &str, replacement_prefix: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid rewrite pattern '{}': {}", pattern, e))?;

        if !replacement_prefix.contains(marker) {
            anyhow::bail!(
                "Replacement '{}' does not contain marker '{}'; the rule would rewrite its own output",
                replacement_prefix,
                marker
            );
        }

        Ok(Self {
            pattern,
            marker: marker.to_string(),
            replacement_prefix: replacement_prefix.to_string(),
        })
    }

    /// The canonical rule: redirect sibling-directory references under the
    /// given prefix.
    pub fn sibling_to(replacement_prefix: &str, marker: &str) -> Result<Self> {
        Self::new(SIBLING_PATTERN, marker, replacement_prefix)
    }

    /// Apply the rule to every qualifying reference entry in the manifest.
    /// Returns the number of entries modified; zero matches is not an error.
    pub fn apply(&self, manifest: &mut ProjectManifest) -> usize {
        let mut rewrites = Vec::new();

        for entry in manifest.references() {
            if entry.raw_path.contains(&self.marker) {
                // Already rewritten by this rule.
                continue;
            }
            if let Some(m) = self.pattern.find(&entry.raw_path) {
                if m.start() == 0 {
                    let new_path =
                        format!("{}{}", self.replacement_prefix, &entry.raw_path[m.end()..]);
                    rewrites.push((entry.name.clone(), entry.section, new_path));
                }
            }
        }

        for (name, section, new_path) in &rewrites {
            manifest.set_reference_path(name, section, new_path);
        }

        rewrites.len()
    }
}

/// Outcome of a batch rewrite over one workspace root.
#[derive(Debug, Default, Serialize)]
pub struct RewriteReport {
    pub manifests_scanned: usize,
    pub manifests_changed: usize,
    pub references_rewritten: usize,
    pub failures: Vec<ItemFailure>,
}

impl RewriteReport {
    pub fn print(&self, dry_run: bool) {
        for failure in &self.failures {
            failure.warn();
        }

        if dry_run {
            println!("{} Dry run mode, no files written", "Info:".blue().bold());
        }

        println!(
            "\n{} {} reference(s) rewritten across {} of {} manifest(s)",
            "✓".green().bold(),
            self.references_rewritten,
            self.manifests_changed,
            self.manifests_scanned
        );

        if !self.failures.is_empty() {
            println!(
                "{} {} manifest(s) could not be processed",
                "✗".red().bold(),
                self.failures.len()
            );
        }
    }
}

/// Scan a root, apply the rule to every matching manifest, and save the ones
/// that changed. Per-manifest parse and write failures are recorded and do
/// not abort the rest of the batch.
pub fn rewrite_workspace(
    root: impl AsRef<Path>,
    filter: Option<NamePattern>,
    rule: &RewriteRule,
    dry_run: bool,
) -> Result<RewriteReport> {
    let scanner = match filter {
        Some(filter) => WorkspaceScanner::with_filter(&root, filter),
        None => WorkspaceScanner::new(&root),
    };

    let mut report = RewriteReport::default();

    for path in scanner.find_manifest_paths()? {
        report.manifests_scanned += 1;

        let mut manifest = match ProjectManifest::load(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                report.failures.push(ItemFailure {
                    item: path.display().to_string(),
                    reason: format!("{:#}", e),
                });
                continue;
            }
        };

        let rewritten = rule.apply(&mut manifest);
        if rewritten == 0 {
            continue;
        }

        if !dry_run {
            if let Err(e) = manifest.save() {
                report.failures.push(ItemFailure {
                    item: path.display().to_string(),
                    reason: format!("{:#}", e),
                });
                continue;
            }
        }

        report.manifests_changed += 1;
        report.references_rewritten += rewritten;
    }

    Ok(report)
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
