//! Author and commit records derived from `git log` output.

use std::collections::HashMap;
use std::fmt;

use gitauth_git::GitOps;
use serde::Serialize;

use crate::error::Result;

/// A distinct commit author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    /// Author name as recorded in commits.
    pub name: String,
    /// Author email as recorded in commits.
    pub email: String,
    /// Number of commits carrying this identity.
    pub commits: usize,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A single commit as shown by dry-run previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full commit hash.
    pub hash: String,
    /// Author name.
    pub author_name: String,
    /// Author email.
    pub author_email: String,
    /// First line of the commit message.
    pub subject: String,
}

impl Commit {
    /// Abbreviated hash for table display.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(8)]
    }
}

/// Parse `git log --format=%an%x09%ae` output into deduplicated authors.
///
/// Identities are counted per `(name, email)` pair and returned sorted by
/// commit count descending, then name (case-insensitive).
#[must_use]
pub fn parse_authors(log: &str) -> Vec<Author> {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for line in log.lines() {
        let Some((name, email)) = line.split_once('\t') else {
            continue;
        };
        *counts
            .entry((name.to_string(), email.to_string()))
            .or_insert(0) += 1;
    }

    let mut authors: Vec<Author> = counts
        .into_iter()
        .map(|((name, email), commits)| Author {
            name,
            email,
            commits,
        })
        .collect();
    authors.sort_by(|a, b| {
        b.commits
            .cmp(&a.commits)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    authors
}

/// List the unique authors in the repository.
///
/// # Errors
/// Returns an error if the underlying `git log` fails.
pub fn detect_authors(git: &impl GitOps, branch: Option<&str>) -> Result<Vec<Author>> {
    let log = git.log_authors(branch)?;
    Ok(parse_authors(&log))
}

/// Parse `git log --format=%H%x09%an%x09%ae%x09%s` output.
#[must_use]
pub fn parse_commits(log: &str) -> Vec<Commit> {
    log.lines()
        .filter_map(|line| {
            let mut fields = line.splitn(4, '\t');
            Some(Commit {
                hash: fields.next()?.to_string(),
                author_name: fields.next()?.to_string(),
                author_email: fields.next()?.to_string(),
                subject: fields.next().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Find commits matching an author name and/or email (exact match).
///
/// With neither filter set, every commit matches. Commits are returned in
/// `git log` order (newest first); callers apply display limits.
///
/// # Errors
/// Returns an error if the underlying `git log` fails.
pub fn find_commits(
    git: &impl GitOps,
    branch: Option<&str>,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Vec<Commit>> {
    let log = git.log_commits(branch)?;
    let commits = parse_commits(&log)
        .into_iter()
        .filter(|c| {
            name.is_none_or(|n| c.author_name == n) && email.is_none_or(|e| c.author_email == e)
        })
        .collect();
    Ok(commits)
}
