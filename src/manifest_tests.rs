#[cfg(test)]
mod tests {
    use crate::manifest::ProjectManifest;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let manifest_path = dir.path().join(name).join("Cargo.toml");
        fs::create_dir_all(manifest_path.parent().unwrap()).unwrap();
        fs::write(&manifest_path, content).unwrap();
        manifest_path
    }

    #[test]
    fn test_load_collects_references_in_document_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "app",
            r#"[package]
name = "app"
version = "0.1.0"
edition = "2021"

[dependencies]
core = { path = "../core" }
serde = "1.0"

[dev-dependencies]
fixtures = { path = "../fixtures" }

[build-dependencies]
codegen = { path = "../codegen" }
"#,
        );

        let manifest = ProjectManifest::load(&path).unwrap();

        assert_eq!(manifest.project_name, "app");
        let names: Vec<&str> = manifest
            .references()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["core", "fixtures", "codegen"]);
    }

    #[test]
    fn test_non_path_dependencies_are_not_references() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "app",
            r#"[package]
name = "app"
version = "0.1.0"

[dependencies]
serde = "1.0"
anyhow = { version = "1.0" }
"#,
        );

        let manifest = ProjectManifest::load(&path).unwrap();
        assert!(manifest.references().is_empty());
    }

    #[test]
    fn test_target_name_is_final_path_segment() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "app",
            r#"[package]
name = "app"
version = "0.1.0"

[dependencies]
core = { path = "../core" }
vendored = { path = "../../private-repo/src/vendored" }
"#,
        );

        let manifest = ProjectManifest::load(&path).unwrap();
        let targets: Vec<&str> = manifest
            .references()
            .iter()
            .map(|r| r.target_name())
            .collect();
        assert_eq!(targets, vec!["core", "vendored"]);
    }

    #[test]
    fn test_set_reference_path_preserves_surrounding_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "app",
            r#"[package]
name = "app"
version = "0.1.0"

# pinned until the 2.x migration lands
[dependencies]
core = { path = "../core" }
serde = "1.0"
"#,
        );

        let mut manifest = ProjectManifest::load(&path).unwrap();
        assert!(manifest.set_reference_path("core", "dependencies", "../../shared/core"));
        manifest.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# pinned until the 2.x migration lands"));
        assert!(content.contains(r#"path = "../../shared/core""#));
        assert!(content.contains(r#"serde = "1.0""#));

        let reloaded = ProjectManifest::load(&path).unwrap();
        assert_eq!(reloaded.references()[0].raw_path, "../../shared/core");
    }

    #[test]
    fn test_set_reference_path_on_missing_entry_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "app",
            r#"[package]
name = "app"
version = "0.1.0"

[dependencies]
serde = "1.0"
"#,
        );

        let mut manifest = ProjectManifest::load(&path).unwrap();
        assert!(!manifest.set_reference_path("core", "dependencies", "../core"));
        assert!(!manifest.set_reference_path("serde", "dependencies", "../serde"));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(&temp_dir, "bad", "[package\nname = oops");

        assert!(ProjectManifest::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_virtual_workspace_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(&temp_dir, "root", "[workspace]\nmembers = [\"core\"]\n");

        // Must come back as an error, not a panic, so batch callers can skip it.
        let err = ProjectManifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("package.name"));
    }

    #[test]
    fn test_load_requires_project_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(&temp_dir, "anon", "[package]\nversion = \"0.1.0\"\n");

        let err = ProjectManifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("package.name"));
    }
}
