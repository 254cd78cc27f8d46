//! Test-project manifest scaffolding.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audit::source_name;
use crate::manifest::MANIFEST_FILE;
use crate::workspace::ItemFailure;

/// Substitute positional `{0}`, `{1}`, … slots in a template.
pub fn substitute(template: &str, params: &[&str]) -> String {
    let mut output = template.to_string();
    for (index, param) in params.iter().enumerate() {
        output = output.replace(&format!("{{{}}}", index), param);
    }
    output
}

/// Outcome of one scaffolding run.
#[derive(Debug, Default, Serialize)]
pub struct ScaffoldReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl ScaffoldReport {
    pub fn print(&self) {
        for failure in &self.failures {
            failure.warn();
        }

        println!(
            "\n{} {} manifest(s) generated",
            "✓".green().bold(),
            self.written.len()
        );
        for path in &self.written {
            println!("  {}", path.display().to_string().dimmed());
        }

        if !self.failures.is_empty() {
            println!(
                "{} {} target(s) failed",
                "✗".red().bold(),
                self.failures.len()
            );
        }
    }
}

/// Generates manifest files from a parameterized template.
///
/// Slot `{0}` receives the companion source-project name (the target name
/// with its test suffix stripped) and `{1}` the full target name. Templates
/// are opaque data; nothing about them is interpreted beyond the slots.
pub struct Scaffolder {
    template: String,
    out_dir: PathBuf,
}

impl Scaffolder {
    pub fn new(template: impl Into<String>, out_dir: impl AsRef<Path>) -> Self {
        Self {
            template: template.into(),
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Load the template from a file.
    pub fn from_template_file(template: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Self> {
        let template = template.as_ref();
        let content = std::fs::read_to_string(template)
            .with_context(|| format!("Failed to read template {}", template.display()))?;
        Ok(Self::new(content, out_dir))
    }

    /// Destination manifest path for one target name.
    pub fn output_path(&self, target: &str) -> PathBuf {
        self.out_dir.join(target).join(MANIFEST_FILE)
    }

    /// Generate a manifest for each target, overwriting existing files
    /// unconditionally. Destination directories are created as needed;
    /// per-target IO failures are recorded and do not abort the batch.
    pub fn generate(&self, targets: &[String]) -> ScaffoldReport {
        let mut report = ScaffoldReport::default();

        for target in targets {
            let content = substitute(&self.template, &[source_name(target), target]);
            let dest = self.output_path(target);

            let written = std::fs::create_dir_all(self.out_dir.join(target))
                .with_context(|| format!("Failed to create directory for {}", target))
                .and_then(|_| {
                    std::fs::write(&dest, &content)
                        .with_context(|| format!("Failed to write {}", dest.display()))
                });

            match written {
                Ok(()) => report.written.push(dest),
                Err(e) => report.failures.push(ItemFailure {
                    item: target.clone(),
                    reason: format!("{:#}", e),
                }),
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "scaffold_tests.rs"]
mod tests;
