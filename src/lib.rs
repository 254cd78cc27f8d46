//! Build-manifest maintenance utilities for multi-project workspaces.
//!
//! This crate provides tools for rewriting path references inside project
//! manifests, rebuilding an externally-held solution membership list,
//! scaffolding test-project manifests, and auditing test coverage.

pub mod audit;
pub mod manifest;
pub mod rewrite;
pub mod scaffold;
pub mod solution;
pub mod workspace;

pub use audit::{audit, CoverageReport};
pub use manifest::{ProjectManifest, ReferenceEntry};
pub use rewrite::{rewrite_workspace, RewriteReport, RewriteRule};
pub use scaffold::{substitute, ScaffoldReport, Scaffolder};
pub use solution::{Aggregator, CommandAggregator, MembershipSynchronizer, SyncReport};
pub use workspace::{ItemFailure, NamePattern, WorkspaceScanner};
