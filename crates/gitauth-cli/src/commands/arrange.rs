//! `gitauth arrange` command - redistribute commit dates over a timeline.

use anyhow::{Context, Result, bail};
use chrono::{Duration, Local};
use gitauth_core::{ArrangeParams, Zone, apply_schedule, arrange, calculate_schedule};
use gitauth_git::Repository;
use inquire::{Confirm, Text};

use crate::commands::{ArrangeArgs, utils};
use crate::output;

/// Prompt with a default, used for every missing arrange input.
fn ask(prompt: &str, default: &str) -> Result<String> {
    Text::new(prompt)
        .with_default(default)
        .prompt()
        .context("Prompt failed")
}

/// Resolve the commit range to rearrange.
///
/// `--commits N` becomes `HEAD~N..HEAD`; an explicit range string is passed
/// through. Otherwise start/end commits (prompted when missing) are verified
/// and ordered, and the range includes the start commit (`start^..end`, or
/// just `end` when start is a root commit).
fn resolve_range(repo: &Repository, args: &ArrangeArgs) -> Result<String> {
    if let Some(commits) = &args.commits {
        if commits.chars().all(|c| c.is_ascii_digit()) && !commits.is_empty() {
            return Ok(format!("HEAD~{commits}..HEAD"));
        }
        return Ok(commits.clone());
    }

    let start = match &args.start_commit {
        Some(rev) => rev.clone(),
        None => ask("Enter STARTING commit hash (oldest):", "HEAD~10")?,
    };
    let end = match &args.end_commit {
        Some(rev) => rev.clone(),
        None => ask("Enter ENDING commit hash (newest):", "HEAD")?,
    };

    output::debug("Validating commits...");
    let start = repo.rev_parse_verify(&start)?;
    let end = repo.rev_parse_verify(&end)?;

    if !repo.is_ancestor(&start, &end)? {
        bail!("Start commit must be an ancestor of the end commit");
    }

    // `git log start..end` excludes start; anchor on its parent to include
    // it, unless start is a root commit.
    if repo.has_parent(&start) {
        Ok(format!("{start}^..{end}"))
    } else {
        Ok(end)
    }
}

/// Gather timeline parameters, prompting for whatever flags don't supply.
fn resolve_params(
    args: &ArrangeArgs,
    config: &gitauth_core::Config,
) -> Result<ArrangeParams> {
    let today = Local::now().date_naive();

    let start_date = match &args.start_date {
        Some(s) => s.clone(),
        None => ask(
            "Enter start date (YYYY-MM-DD):",
            &(today - Duration::days(30)).to_string(),
        )?,
    };
    let end_date = match &args.end_date {
        Some(s) => s.clone(),
        None => ask("Enter end date (YYYY-MM-DD):", &today.to_string())?,
    };
    let start_time = match &args.start_time {
        Some(s) => s.clone(),
        None => ask("Start time for commits (HH:MM):", &config.arrange.start_time)?,
    };
    let end_time = match &args.end_time {
        Some(s) => s.clone(),
        None => ask("End time for commits (HH:MM):", &config.arrange.end_time)?,
    };
    let timezone = match &args.timezone {
        Some(s) => s.clone(),
        None => ask(
            "Enter timezone (empty for local):",
            &config.arrange.timezone,
        )?,
    };
    let skip_weekends = match args.skip_weekends_choice() {
        Some(choice) => choice,
        None if args.force => config.arrange.skip_weekends,
        None => Confirm::new("Do you want to skip weekends?")
            .with_default(config.arrange.skip_weekends)
            .prompt()
            .context("Prompt failed")?,
    };

    let zone: Zone = timezone.parse()?;
    Ok(ArrangeParams {
        start_date: arrange::parse_date(&start_date)?,
        end_date: arrange::parse_date(&end_date)?,
        start_time: arrange::parse_time(&start_time)?,
        end_time: arrange::parse_time(&end_time)?,
        zone,
        skip_weekends,
    })
}

/// Run the arrange command.
pub fn run(args: &ArrangeArgs) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config(args.path.as_deref())?;

    if !repo.has_commits() {
        output::warn("Repository has no commits yet");
        return Ok(());
    }

    let range = resolve_range(&repo, args)?;
    let params = resolve_params(args, &config)?;

    output::info("Fetching commits...");
    output::debug(&format!("Range: {range}"));
    let hashes = repo.rev_list(&range)?;
    if hashes.is_empty() {
        output::warn("No commits found in range");
        return Ok(());
    }

    output::info("Calculating new schedule...");
    let schedule = calculate_schedule(&repo, &hashes, &params)?;
    output::success(&format!("Scheduled {} commit(s)", schedule.len()));

    output::detail("\nPreview (first 5):");
    for item in schedule.iter().take(5) {
        output::detail(&format!("  {} -> {}", &item.hash[..8.min(item.hash.len())], item.when));
    }

    if !args.force {
        let proceed = Confirm::new("Do you want to apply these changes?")
            .with_default(false)
            .prompt()
            .context("Confirmation failed")?;
        if !proceed {
            output::info("Aborted");
            return Ok(());
        }
    }

    output::info("Rewriting history...");
    apply_schedule(&repo, &schedule)?;

    output::success("History rewritten successfully!");
    output::detail("\nNext steps:");
    output::detail("  1. Verify the changes: git log");
    output::detail("  2. Force push to the remote: gitauth push");
    Ok(())
}
