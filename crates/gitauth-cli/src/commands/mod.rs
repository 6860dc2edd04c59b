//! CLI definition and command modules.

pub mod arrange;
pub mod backup;
pub mod check;
pub mod completions;
pub mod dry_run;
pub mod push;
pub mod rewrite;
pub mod utils;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Rewrite Git commit authors and committers safely.
#[derive(Parser)]
#[command(
    name = "gitauth",
    version,
    about = "Rewrite Git commit authors and committers safely",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all unique authors in the repository
    Check {
        /// Path to the Git repository (default: current directory)
        path: Option<PathBuf>,

        /// Specific branch to analyze (default: all branches)
        #[arg(short, long)]
        branch: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview which commits would be changed (dry run)
    DryRun(DryRunArgs),

    /// Rewrite Git commit authors and committers
    Rewrite(RewriteArgs),

    /// Create a backup archive of the repository
    Backup(BackupArgs),

    /// Push rewritten history to a remote repository
    Push(PushArgs),

    /// Arrange commit dates over a specified timeline
    Arrange(ArrangeArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Options for `gitauth dry-run`.
#[derive(Args)]
pub struct DryRunArgs {
    /// Old author email to search for
    #[arg(short = 'e', long)]
    pub old_email: Option<String>,

    /// Old author name to search for
    #[arg(short = 'n', long)]
    pub old_name: Option<String>,

    /// Show all commits
    #[arg(short, long)]
    pub all: bool,

    /// Alias for --all
    #[arg(long, hide = true)]
    pub map_all: bool,

    /// Interactively select author(s) to filter by
    #[arg(long)]
    pub choose_old: bool,

    /// Maximum number of commits to show
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,

    /// Path to the Git repository (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Specific branch to analyze (default: all branches)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for `gitauth rewrite`.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RewriteArgs {
    /// Old author email to replace
    #[arg(short = 'e', long)]
    pub old_email: Option<String>,

    /// Old author name to replace
    #[arg(short = 'n', long)]
    pub old_name: Option<String>,

    /// New author name
    #[arg(short = 'N', long)]
    pub new_name: Option<String>,

    /// New author email
    #[arg(short = 'E', long)]
    pub new_email: Option<String>,

    /// Rewrite all commits regardless of author
    #[arg(short, long)]
    pub all: bool,

    /// Alias for --all: map all authors to the new identity
    #[arg(long, hide = true)]
    pub map_all: bool,

    /// Interactively select author(s) to rewrite and choose the new identity
    #[arg(long)]
    pub choose_old: bool,

    /// Skip the automatic backup
    #[arg(long)]
    pub no_backup: bool,

    /// Proceed without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Path to the Git repository (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Specific branch to rewrite (default: all branches and tags)
    #[arg(short, long)]
    pub branch: Option<String>,
}

/// Options for `gitauth backup`.
#[derive(Args)]
pub struct BackupArgs {
    /// Output directory for the archive (default: the repository's parent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Backup format: 'tar.gz' or 'zip'
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to the Git repository (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Options for `gitauth push`.
#[derive(Args)]
pub struct PushArgs {
    /// Force push without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Remote name (default: from config, usually 'origin')
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Path to the Git repository (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Options for `gitauth arrange`.
#[derive(Args)]
pub struct ArrangeArgs {
    /// Starting commit hash (oldest)
    #[arg(short = 's', long)]
    pub start_commit: Option<String>,

    /// Ending commit hash (newest)
    #[arg(short = 'e', long)]
    pub end_commit: Option<String>,

    /// Commit range ('HEAD~10..HEAD', or '50' for the last 50); overrides start/end
    #[arg(short, long)]
    pub commits: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Daily start time (HH:MM)
    #[arg(long)]
    pub start_time: Option<String>,

    /// Daily end time (HH:MM)
    #[arg(long)]
    pub end_time: Option<String>,

    /// Timezone: 'local', 'UTC', a fixed offset like '+05:30', or an IANA name
    #[arg(long)]
    pub timezone: Option<String>,

    /// Skip weekends
    #[arg(long)]
    pub skip_weekends: bool,

    /// Do not skip weekends
    #[arg(long, conflicts_with = "skip_weekends")]
    pub no_skip_weekends: bool,

    /// Apply without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Path to the Git repository (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

impl ArrangeArgs {
    /// Resolve the weekend flag pair into an explicit choice, if any.
    #[must_use]
    pub const fn skip_weekends_choice(&self) -> Option<bool> {
        if self.skip_weekends {
            Some(true)
        } else if self.no_skip_weekends {
            Some(false)
        } else {
            None
        }
    }
}
