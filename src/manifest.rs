//! Project manifest parsing and manipulation utilities.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use toml_edit::{value, DocumentMut, Item};

/// File name every project manifest carries.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Manifest sections that may carry path references, in document order.
pub const REFERENCE_SECTIONS: [&str; 3] =
    ["dependencies", "dev-dependencies", "build-dependencies"];

/// Represents a single project's manifest file.
///
/// The underlying document is kept verbatim so that a load → mutate → save
/// cycle only changes the entries that were explicitly rewritten; comments,
/// ordering, and formatting of everything else survive untouched.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    pub path: PathBuf,
    pub project_name: String,
    references: Vec<ReferenceEntry>,
    document: DocumentMut,
}

/// A path reference to another project, as written in the manifest.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    pub name: String,
    pub raw_path: String,
    pub section: &'static str,
}

impl ReferenceEntry {
    /// Name of the referenced project, derived from the final path segment.
    pub fn target_name(&self) -> &str {
        self.raw_path
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.raw_path)
    }
}

impl ProjectManifest {
    /// Load a manifest file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document: DocumentMut = content
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let project_name = document
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing package.name in {}", path.display()))?
            .to_string();

        let mut references = Vec::new();
        for section in REFERENCE_SECTIONS {
            if let Some(Item::Table(deps)) = document.get(section) {
                for (name, item) in deps.iter() {
                    if let Some(raw_path) = item.get("path").and_then(|p| p.as_str()) {
                        references.push(ReferenceEntry {
                            name: name.to_string(),
                            raw_path: raw_path.to_string(),
                            section,
                        });
                    }
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            project_name,
            references,
            document,
        })
    }

    /// Path reference entries in document order.
    pub fn references(&self) -> &[ReferenceEntry] {
        &self.references
    }

    /// Rewrite the path of one reference entry in place.
    ///
    /// Returns false when no entry with that name carries a path in the
    /// given section; the document is untouched in that case.
    pub fn set_reference_path(&mut self, name: &str, section: &str, new_path: &str) -> bool {
        let mut updated = false;

        if let Some(deps) = self.document.get_mut(section) {
            if let Some(deps_table) = deps.as_table_mut() {
                if let Some(dep_item) = deps_table.get_mut(name) {
                    if let Some(path_item) = dep_item.get_mut("path") {
                        *path_item = value(new_path);
                        updated = true;
                    }
                }
            }
        }

        if updated {
            if let Some(entry) = self
                .references
                .iter_mut()
                .find(|r| r.name == name && r.section == section)
            {
                entry.raw_path = new_path.to_string();
            }
        }

        updated
    }

    /// Save the manifest back to disk. Nothing is written before this call.
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, self.document.to_string())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
