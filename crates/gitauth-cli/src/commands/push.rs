//! `gitauth push` command - force-push rewritten history.

use anyhow::{Context, Result};
use inquire::Confirm;

use crate::commands::{PushArgs, utils};
use crate::output;

/// Run the push command.
pub fn run(args: &PushArgs) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config(args.path.as_deref())?;
    repo.require_commits()?;

    let remote = args
        .remote
        .as_deref()
        .unwrap_or(&config.general.default_remote);
    let url = repo.remote_url(remote)?;
    let branch = repo.current_branch()?;

    output::info("Push configuration:");
    output::detail(&format!("  Remote: {remote}"));
    output::detail(&format!("  URL:    {url}"));
    output::detail(&format!("  Branch: {branch}"));

    output::warn(
        "This will force push rewritten history! \
         All collaborators must re-clone or reset their local repositories.",
    );

    if !args.force {
        let proceed = Confirm::new("Do you want to proceed?")
            .with_default(false)
            .prompt()
            .context("Confirmation failed")?;
        if !proceed {
            output::info("Aborted");
            return Ok(());
        }
    }

    output::info("Pushing to remote...");
    repo.push_force_with_lease(remote, &branch)?;

    output::success("Successfully pushed to remote!");
    output::detail("\nImportant: notify all collaborators to:");
    output::detail("  1. Save any local work");
    output::detail("  2. Delete their local repository");
    output::detail("  3. Clone fresh from the remote");
    Ok(())
}
