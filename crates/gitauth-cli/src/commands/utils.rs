//! Shared helpers for command modules.

use std::path::Path;

use anyhow::{Context, Result};
use gitauth_core::{Author, Commit, Config};
use gitauth_git::Repository;

use crate::output;

/// Open the repository at `path` (or the current directory).
pub fn open_repo(path: Option<&Path>) -> Result<Repository> {
    Repository::discover(path).context("Not inside a git repository")
}

/// Open the repository and load its `.gitauth.toml` config.
pub fn open_repo_and_config(path: Option<&Path>) -> Result<(Repository, Config)> {
    let repo = open_repo(path)?;
    let config = Config::load_from_repo(repo.workdir())?;
    Ok((repo, config))
}

/// Print an aligned author table.
pub fn print_author_table(authors: &[Author]) {
    let name_width = authors.iter().map(|a| a.name.len()).max().unwrap_or(4);
    let email_width = authors.iter().map(|a| a.email.len()).max().unwrap_or(5);

    println!();
    output::hr();
    for author in authors {
        output::detail(&format!(
            "  {:<name_width$}  {:<email_width$}  {:>6} commit(s)",
            author.name, author.email, author.commits
        ));
    }
    output::hr();
    println!();
}

/// Print a commit preview table, truncated to `limit` rows.
pub fn print_commit_table(commits: &[Commit], limit: usize) {
    println!();
    output::hr();
    for commit in commits.iter().take(limit) {
        output::detail(&format!(
            "  {}  {}  {}",
            commit.short_hash(),
            output::identity(&commit.author_name, &commit.author_email),
            output::truncate_subject(&commit.subject, 60)
        ));
    }
    output::hr();

    if commits.len() > limit {
        output::detail(&format!("  ... and {} more commit(s)", commits.len() - limit));
    }
    println!();
}
