//! Solution membership synchronization.
//!
//! The membership list itself lives with an external aggregator tool; this
//! module only drives it through a three-operation contract and rebuilds the
//! membership from scratch on every run, so the end state converges no
//! matter how far the list had drifted.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::workspace::{ItemFailure, WorkspaceScanner};

/// The three operations the synchronizer needs from an aggregator.
pub trait Aggregator {
    /// Current member identifiers, in the aggregator's own order.
    fn list(&self) -> Result<Vec<String>>;
    /// Remove one member by the identifier `list` reported.
    fn remove(&self, id: &str) -> Result<()>;
    /// Add one manifest by path.
    fn add(&self, path: &Path) -> Result<()>;
}

/// Aggregator backed by an external CLI tool, invoked as
/// `<command> list`, `<command> remove <id>`, `<command> add <path>`.
#[derive(Debug)]
pub struct CommandAggregator {
    program: String,
    base_args: Vec<String>,
}

impl CommandAggregator {
    /// Parse a command line into program and leading arguments.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Empty aggregator command"))?;
        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run aggregator '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Aggregator '{} {}' failed:\n{}",
                self.program,
                args.join(" "),
                stderr.trim()
            );
        }

        Ok(output)
    }
}

impl Aggregator for CommandAggregator {
    fn list(&self) -> Result<Vec<String>> {
        let output = self.run(&["list"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.run(&["remove", id]).map(|_| ())
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.run(&["add", &path.to_string_lossy()]).map(|_| ())
    }
}

/// Outcome of one synchronization run.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// Members cleared from the previous list; a removal the aggregator
    /// reports as not found still counts as cleared.
    pub removed: usize,
    pub added: usize,
    pub duplicates_skipped: usize,
    pub failures: Vec<ItemFailure>,
}

impl SyncReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn print(&self) {
        for failure in &self.failures {
            failure.warn();
        }

        println!(
            "\n{} Membership rebuilt: {} removed, {} added",
            "✓".green().bold(),
            self.removed,
            self.added
        );

        if self.duplicates_skipped > 0 {
            println!(
                "  {} duplicate manifest(s) skipped",
                self.duplicates_skipped
            );
        }

        if self.is_partial() {
            println!(
                "{} Partial success: {} item(s) failed",
                "✗".red().bold(),
                self.failures.len()
            );
        }
    }
}

/// Rebuilds the aggregator's membership to match the manifests discovered
/// under a set of source roots.
pub struct MembershipSynchronizer<A: Aggregator> {
    aggregator: A,
}

impl<A: Aggregator> MembershipSynchronizer<A> {
    pub fn new(aggregator: A) -> Self {
        Self { aggregator }
    }

    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Remove every current member, then re-add everything discovered under
    /// the given roots in discovery order, skipping exact duplicates.
    ///
    /// Removal failures (typically a member that is already gone) count as
    /// success: the rebuild that follows supersedes the entry either way.
    /// Per-item add failures are recorded and do not abort the rest of the
    /// run; an unreachable aggregator or an unreadable root aborts the whole
    /// operation. Two runs over an unchanged filesystem produce the same
    /// membership.
    pub fn synchronize(&self, roots: &[PathBuf]) -> Result<SyncReport> {
        let current = self
            .aggregator
            .list()
            .context("Failed to query current membership")?;

        let mut report = SyncReport::default();

        for id in current {
            match self.aggregator.remove(&id) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    let tolerated = ItemFailure {
                        item: id,
                        reason: format!("{:#}", e),
                    };
                    tolerated.warn();
                    report.removed += 1;
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        for root in roots {
            let scanner = WorkspaceScanner::new(root);
            for path in scanner
                .find_manifest_paths()
                .with_context(|| format!("Failed to scan {}", root.display()))?
            {
                if !seen.insert(path.to_string_lossy().to_string()) {
                    report.duplicates_skipped += 1;
                    continue;
                }
                match self.aggregator.add(&path) {
                    Ok(()) => report.added += 1,
                    Err(e) => report.failures.push(ItemFailure {
                        item: path.display().to_string(),
                        reason: format!("{:#}", e),
                    }),
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
#[path = "solution_tests.rs"]
mod tests;
