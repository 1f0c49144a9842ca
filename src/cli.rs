//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `sheetsync`.
#[derive(Debug, Parser)]
#[command(name = "sheetsync", version, about = "Keep spreadsheet rows and GitHub issues in sync")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Which spreadsheet range to work on.
#[derive(Debug, Clone, Args)]
pub struct SheetArgs {
    /// ID of the spreadsheet (the long token in its URL).
    #[arg(long)]
    pub spreadsheet_id: String,
    /// A1 range holding the header row and data rows, e.g. `Tasks!A1:L`.
    #[arg(long)]
    pub spreadsheet_range: String,
}

/// Arguments of the `sync` subcommand.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Spreadsheet and range to sync.
    #[command(flatten)]
    pub sheet: SheetArgs,
    /// Owner of the GitHub repository.
    #[arg(long)]
    pub github_owner: String,
    /// Name of the GitHub repository.
    #[arg(long)]
    pub github_repo: String,
    /// Issue body template file.
    #[arg(long)]
    pub template: PathBuf,
    /// Compare issues without creating or editing them, and print the write-back instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update one issue per row and write issue state back.
    Sync(SyncArgs),
    /// List the header columns of a range.
    Headers(SheetArgs),
}

impl Command {
    /// The spreadsheet the command works on.
    #[must_use]
    pub fn sheet(&self) -> &SheetArgs {
        match self {
            Self::Sync(args) => &args.sheet,
            Self::Headers(sheet) => sheet,
        }
    }
}
