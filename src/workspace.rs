//! Workspace scanning and manifest discovery.

use anyhow::{Context, Result};
use colored::Colorize;
use regex::RegexBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::manifest::{ProjectManifest, MANIFEST_FILE};

/// Case-insensitive match against a project directory name.
///
/// Plain strings match as substrings; a `re:` prefix switches to a full
/// regular expression.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Substring(String),
    Regex(regex::Regex),
}

impl NamePattern {
    /// Parse a pattern from its CLI spelling.
    pub fn new(spec: &str) -> Result<Self> {
        if let Some(pattern) = spec.strip_prefix("re:") {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid pattern '{}'", pattern))?;
            Ok(Self::Regex(regex))
        } else {
            Ok(Self::Substring(spec.to_lowercase()))
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Substring(needle) => name.to_lowercase().contains(needle),
            Self::Regex(regex) => regex.is_match(name),
        }
    }
}

/// A per-item problem recorded during a batch operation.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

impl ItemFailure {
    pub fn warn(&self) {
        eprintln!("{} {}: {}", "Warning:".yellow().bold(), self.item, self.reason);
    }
}

/// Scans a directory tree for project manifests.
///
/// Every call rescans the filesystem; nothing is cached between calls.
/// Symlinks are not followed, so symlink cycles are out of scope.
#[derive(Debug)]
pub struct WorkspaceScanner {
    root: PathBuf,
    filter: Option<NamePattern>,
}

impl WorkspaceScanner {
    /// Create a new workspace scanner.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            filter: None,
        }
    }

    /// Create a scanner that only yields manifests whose containing
    /// directory name matches the pattern.
    pub fn with_filter(root: impl AsRef<Path>, filter: NamePattern) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            filter: Some(filter),
        }
    }

    /// Find all manifest files under the root, excluding build and VCS
    /// directories. An empty workspace yields an empty list, not an error.
    pub fn find_manifest_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !matches!(name.as_ref(), "target" | ".git" | "node_modules" | ".cargo")
            })
        {
            let entry = entry.context("Failed to read directory entry")?;

            if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE {
                if let Some(filter) = &self.filter {
                    let dir_name = entry
                        .path()
                        .parent()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    if !filter.matches(&dir_name) {
                        continue;
                    }
                }
                paths.push(entry.path().to_path_buf());
            }
        }

        Ok(paths)
    }

    /// Load every discovered manifest. Unparseable manifests are reported
    /// and skipped; they never abort the rest of the batch.
    pub fn find_manifests(&self) -> Result<Vec<ProjectManifest>> {
        let mut manifests = Vec::new();

        for path in self.find_manifest_paths()? {
            match ProjectManifest::load(&path) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        Ok(manifests)
    }

    /// Project names of every loadable manifest under the root, sorted.
    pub fn project_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .find_manifests()?
            .into_iter()
            .map(|m| m.project_name)
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
