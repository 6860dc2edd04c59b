//! `gitauth dry-run` command - preview which commits a rewrite would touch.

use anyhow::{Result, bail};
use gitauth_core::{Commit, detect_authors, find_commits};
use serde::Serialize;

use crate::commands::utils;
use crate::commands::{DryRunArgs, rewrite::select_authors};
use crate::output;

#[derive(Serialize)]
struct JsonOutput<'a> {
    total: usize,
    commits: &'a [Commit],
}

/// Run the dry-run command.
pub fn run(args: &DryRunArgs) -> Result<()> {
    let repo = utils::open_repo(args.path.as_deref())?;

    if !repo.has_commits() {
        output::warn("Repository has no commits yet");
        return Ok(());
    }

    let branch = args.branch.as_deref();
    let all = args.all || args.map_all;

    let commits = if args.choose_old {
        let authors = detect_authors(&repo, branch)?;
        if authors.is_empty() {
            output::warn("No authors found to choose from");
            return Ok(());
        }
        let chosen = select_authors("Select author(s) to filter by:", &authors)?;
        if chosen.is_empty() {
            output::info("No authors selected");
            return Ok(());
        }

        // Union of the selected authors' commits, deduplicated by hash.
        let mut commits: Vec<Commit> = Vec::new();
        for author in &chosen {
            for commit in find_commits(
                &repo,
                branch,
                Some(author.name.as_str()),
                Some(author.email.as_str()),
            )? {
                if !commits.iter().any(|c| c.hash == commit.hash) {
                    commits.push(commit);
                }
            }
        }
        commits
    } else if all {
        find_commits(&repo, branch, None, None)?
    } else {
        if args.old_email.is_none() && args.old_name.is_none() {
            bail!("Specify --old-email, --old-name, --all, or --choose-old");
        }
        find_commits(
            &repo,
            branch,
            args.old_name.as_deref(),
            args.old_email.as_deref(),
        )?
    };

    if commits.is_empty() {
        output::warn("No matching commits found");
        return Ok(());
    }

    if args.json {
        let shown = &commits[..commits.len().min(args.limit)];
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOutput {
                total: commits.len(),
                commits: shown,
            })?
        );
        return Ok(());
    }

    let showing = commits.len().min(args.limit);
    output::success(&format!(
        "Found {} commit(s). Showing first {showing}",
        commits.len()
    ));
    utils::print_commit_table(&commits, args.limit);
    Ok(())
}
