//! `gitauth check` command - list the unique authors in the repository.

use std::path::Path;

use anyhow::Result;
use gitauth_core::{Author, detect_authors};
use serde::Serialize;

use crate::commands::utils;
use crate::output;

#[derive(Serialize)]
struct JsonOutput<'a> {
    authors: &'a [Author],
}

/// Run the check command.
pub fn run(path: Option<&Path>, branch: Option<&str>, json: bool) -> Result<()> {
    let repo = utils::open_repo(path)?;

    if !repo.has_commits() {
        output::warn("Repository has no commits yet");
        return Ok(());
    }

    output::debug(&format!("Scanning {}", repo.workdir().display()));
    let authors = detect_authors(&repo, branch)?;

    if authors.is_empty() {
        output::warn("No authors found");
        return Ok(());
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOutput { authors: &authors })?
        );
        return Ok(());
    }

    output::success(&format!("Found {} unique author(s)", authors.len()));
    utils::print_author_table(&authors);
    Ok(())
}
