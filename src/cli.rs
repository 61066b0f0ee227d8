//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::PROJECT_METADATA_FILE_NAME;

/// Top-level CLI parser for `targetscope`.
#[derive(Debug, Parser)]
#[command(
    name = "targetscope",
    version,
    about = "Resolve which monorepo units must be rebuilt for a change"
)]
pub struct Cli {
    /// Enable debug logging (also enabled by `CI_SCRIPT_DEBUG`).
    #[arg(long, global = true)]
    pub debug: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that reads the project metadata.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Path of the project metadata file.
    #[arg(long, env = "TARGETSCOPE_METADATA_PATH", default_value = PROJECT_METADATA_FILE_NAME)]
    pub metadata_path: PathBuf,

    /// Repository root that unit directories are resolved against.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the units to build and write them as JSON.
    Resolve {
        /// Revision before the change.
        #[arg(long, env = "BEFORE_COMMIT_SHA")]
        before_sha: Option<String>,

        /// Revision after the change.
        #[arg(long, env = "AFTER_COMMIT_SHA")]
        after_sha: Option<String>,

        #[command(flatten)]
        project: ProjectArgs,

        /// Where to write the result.
        #[arg(long, env = "TARGETSCOPE_OUTPUT_FILE", default_value = "output.json")]
        output_file: PathBuf,

        /// Read the changed files from this file instead of running git.
        /// Takes precedence over the revisions.
        #[arg(long)]
        changed_files: Option<PathBuf>,

        /// Also emit a `name:version` build matrix.
        #[arg(long)]
        matrix: bool,
    },
    /// Validate the project and unit metadata and list every unit.
    Check {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

impl Command {
    /// The project options of whichever command was chosen.
    #[must_use]
    pub fn project(&self) -> &ProjectArgs {
        match self {
            Self::Resolve { project, .. } | Self::Check { project } => project,
        }
    }
}
