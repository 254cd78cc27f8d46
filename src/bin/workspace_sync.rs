use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use workspace_sync::{
    audit, rewrite_workspace, CommandAggregator, MembershipSynchronizer, NamePattern, RewriteRule,
    Scaffolder, WorkspaceScanner,
};

#[derive(Parser)]
#[command(
    name = "workspace-sync",
    version,
    about = "Build-manifest maintenance for multi-project workspaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite sibling-directory references to point into a relocated tree
    RewriteRefs {
        /// Workspace root to scan
        root: PathBuf,
        /// Only touch manifests whose directory name matches (substring, or re:REGEX)
        #[arg(long)]
        pattern: Option<String>,
        /// Prefix that replaces the matched traversal token
        #[arg(long, default_value = "../../private-repo/src/")]
        replacement: String,
        /// Marker substring guarding already-rewritten entries
        #[arg(long, default_value = "private-repo")]
        marker: String,
        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild the aggregator's membership from the manifests under the roots
    SyncMembership {
        /// Source roots to scan, in order
        #[arg(required = true)]
        roots: Vec<PathBuf>,
        /// Aggregator command, invoked as `CMD list|remove <id>|add <path>`
        #[arg(long)]
        aggregator: String,
    },
    /// Generate test-project manifests from a template file
    Scaffold {
        /// Template file with {0} (source name) and {1} (target name) slots
        template: PathBuf,
        /// Target project names, e.g. foo-tests
        #[arg(required = true)]
        names: Vec<String>,
        /// Directory to generate into
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Report source projects without tests and tests without sources
    Audit {
        /// Root containing the source projects
        src_root: PathBuf,
        /// Root containing the test projects
        test_root: PathBuf,
        /// Source names to exempt from the missing check (substring, or re:REGEX)
        #[arg(long)]
        exclude: Option<String>,
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::RewriteRefs {
            root,
            pattern,
            replacement,
            marker,
            dry_run,
        } => {
            let filter = pattern.as_deref().map(NamePattern::new).transpose()?;
            let rule = RewriteRule::sibling_to(&replacement, &marker)?;
            let report = rewrite_workspace(&root, filter, &rule, dry_run)?;
            report.print(dry_run);

            // Mutation commands report failure when any manifest was left behind.
            if report.failures.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::SyncMembership { roots, aggregator } => {
            let aggregator = CommandAggregator::parse(&aggregator)?;
            let synchronizer = MembershipSynchronizer::new(aggregator);
            let report = synchronizer.synchronize(&roots)?;
            report.print();

            // Partial failures are reported, not fatal.
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scaffold {
            template,
            names,
            out_dir,
        } => {
            let scaffolder = Scaffolder::from_template_file(&template, &out_dir)?;
            let report = scaffolder.generate(&names);
            report.print();

            if report.failures.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Audit {
            src_root,
            test_root,
            exclude,
            json,
        } => {
            let exclude = exclude.as_deref().map(NamePattern::new).transpose()?;
            let source_names = WorkspaceScanner::new(&src_root).project_names()?;
            let test_names = WorkspaceScanner::new(&test_root).project_names()?;
            let report = audit(&source_names, &test_names, exclude.as_ref());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }

            // Gaps are the report's content, not a failure to produce it.
            Ok(ExitCode::SUCCESS)
        }
    }
}
