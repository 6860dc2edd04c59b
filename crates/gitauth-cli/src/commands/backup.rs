//! `gitauth backup` command - archive the repository before a rewrite.

use anyhow::Result;
use gitauth_core::{BackupFormat, create_backup};

use crate::commands::{BackupArgs, utils};
use crate::output;

/// Run the backup command.
pub fn run(args: &BackupArgs) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config(args.path.as_deref())?;

    let format: BackupFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.general.backup_format)
        .parse()?;

    output::info("Creating backup...");
    output::debug(&format!(
        "Archiving {} with `{}`",
        repo.workdir().display(),
        format.tool()
    ));

    let path = create_backup(&repo, args.output.as_deref(), format)?;

    output::success("Backup created successfully:");
    output::detail(&format!("  {}", path.display()));
    Ok(())
}
