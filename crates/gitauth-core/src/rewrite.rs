//! Rewrite planning and delegation to the external history-rewrite tools.
//!
//! A [`RewritePlan`] captures which commit identities to replace and with
//! what. Execution prefers `git filter-repo` (driven by a mailmap and/or
//! callbacks) and falls back to `git filter-branch --env-filter` when the
//! plugin is not installed. Both backends rewrite author and committer
//! fields.

use gitauth_git::{GitOps, Repository};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::author::find_commits;
use crate::error::Result;
use crate::mailmap::Mailmap;

/// The replacement identity applied by a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// New author/committer name.
    pub name: String,
    /// New author/committer email.
    pub email: String,
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// An identity to be replaced. At least one field is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldIdentity {
    /// Match on this author name, if set.
    pub name: Option<String>,
    /// Match on this author email, if set.
    pub email: Option<String>,
}

/// Which commits a rewrite applies to.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Every commit, regardless of author.
    All,
    /// Commits matching any of these identities.
    Authors(Vec<OldIdentity>),
}

/// A fully resolved rewrite: what to match and what to write instead.
#[derive(Debug, Clone)]
pub struct RewritePlan {
    /// Commits to rewrite.
    pub selection: Selection,
    /// Replacement identity.
    pub new: Identity,
}

/// Escape a string as a Python bytes literal for filter-repo callbacks.
///
/// Non-ASCII input is emitted as `\xNN` escapes of its UTF-8 encoding, so the
/// generated callback stays pure ASCII.
fn py_bytes(s: &str) -> String {
    let mut out = String::from("b\"");
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push('"');
    out
}

/// Quote a string for a POSIX shell single-quoted context.
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

impl RewritePlan {
    /// Arguments for `git filter-repo`, plus the mailmap temp file when one
    /// is used (it must outlive the filter-repo run).
    ///
    /// - [`Selection::All`] becomes name/email callbacks.
    /// - Email-bearing identities become mailmap entries.
    /// - Name-only identities become a commit callback, since mailmap cannot
    ///   match on name alone.
    ///
    /// When `branch` is set the run is restricted to it via `--refs`;
    /// otherwise filter-repo rewrites all refs.
    ///
    /// # Errors
    /// Returns an error if the mailmap temp file cannot be written.
    pub fn filter_repo_args(
        &self,
        branch: Option<&str>,
    ) -> Result<(Vec<String>, Option<NamedTempFile>)> {
        let mut args = vec!["--force".to_string()];
        if let Some(b) = branch {
            args.push("--refs".to_string());
            args.push(b.to_string());
        }

        match &self.selection {
            Selection::All => {
                args.push("--name-callback".to_string());
                args.push(format!("return {}", py_bytes(&self.new.name)));
                args.push("--email-callback".to_string());
                args.push(format!("return {}", py_bytes(&self.new.email)));
                Ok((args, None))
            }
            Selection::Authors(olds) => {
                let mut mailmap = Mailmap::new();
                let mut name_only: Vec<&str> = Vec::new();

                for old in olds {
                    match (&old.name, &old.email) {
                        (Some(name), Some(email)) => {
                            mailmap.map_identity(&self.new, name, email);
                        }
                        (None, Some(email)) => mailmap.map_email(&self.new, email),
                        (Some(name), None) => name_only.push(name),
                        (None, None) => {}
                    }
                }

                let mut guard = None;
                if !mailmap.is_empty() {
                    let file = mailmap.write_temp()?;
                    args.push("--mailmap".to_string());
                    args.push(file.path().display().to_string());
                    guard = Some(file);
                }
                if !name_only.is_empty() {
                    args.push("--commit-callback".to_string());
                    args.push(name_callback(&name_only, &self.new));
                }
                Ok((args, guard))
            }
        }
    }

    /// Shell script for `git filter-branch --env-filter`.
    #[must_use]
    pub fn env_filter(&self) -> String {
        let name = sh_quote(&self.new.name);
        let email = sh_quote(&self.new.email);

        match &self.selection {
            Selection::All => format!(
                "export GIT_AUTHOR_NAME={name}\n\
                 export GIT_AUTHOR_EMAIL={email}\n\
                 export GIT_COMMITTER_NAME={name}\n\
                 export GIT_COMMITTER_EMAIL={email}\n"
            ),
            Selection::Authors(olds) => {
                let mut script = String::new();
                for old in olds {
                    for role in ["AUTHOR", "COMMITTER"] {
                        let Some(cond) = match_condition(old, role) else {
                            continue;
                        };
                        script.push_str(&format!(
                            "if {cond}; then\n    \
                             export GIT_{role}_NAME={name}\n    \
                             export GIT_{role}_EMAIL={email}\nfi\n"
                        ));
                    }
                }
                script
            }
        }
    }

    /// Count the commits this plan would touch, without running anything.
    ///
    /// # Errors
    /// Returns an error if the underlying `git log` fails.
    pub fn count_affected(&self, git: &impl GitOps, branch: Option<&str>) -> Result<usize> {
        match &self.selection {
            Selection::All => Ok(find_commits(git, branch, None, None)?.len()),
            Selection::Authors(olds) => {
                let mut hashes: Vec<String> = Vec::new();
                for old in olds {
                    let commits =
                        find_commits(git, branch, old.name.as_deref(), old.email.as_deref())?;
                    for c in commits {
                        if !hashes.contains(&c.hash) {
                            hashes.push(c.hash);
                        }
                    }
                }
                Ok(hashes.len())
            }
        }
    }

    /// Execute the rewrite, preferring filter-repo with a filter-branch
    /// fallback. Both backends honor the branch restriction; remotes removed
    /// by filter-repo are restored afterwards.
    ///
    /// # Errors
    /// Returns an error if the chosen backend exits non-zero.
    pub fn execute(&self, repo: &Repository, branch: Option<&str>) -> Result<()> {
        if repo.filter_repo_available() {
            let saved = repo.remotes()?;
            let (args, _mailmap_guard) = self.filter_repo_args(branch)?;
            repo.filter_repo(&args)?;
            restore_remotes(repo, &saved);
            Ok(())
        } else {
            repo.filter_branch(&self.env_filter(), branch)?;
            Ok(())
        }
    }
}

/// Shell test matching one old identity for the given role (AUTHOR/COMMITTER).
fn match_condition(old: &OldIdentity, role: &str) -> Option<String> {
    match (&old.name, &old.email) {
        (Some(name), Some(email)) => Some(format!(
            "[ \"$GIT_{role}_EMAIL\" = {} ] && [ \"$GIT_{role}_NAME\" = {} ]",
            sh_quote(email),
            sh_quote(name)
        )),
        (None, Some(email)) => Some(format!("[ \"$GIT_{role}_EMAIL\" = {} ]", sh_quote(email))),
        (Some(name), None) => Some(format!("[ \"$GIT_{role}_NAME\" = {} ]", sh_quote(name))),
        (None, None) => None,
    }
}

/// filter-repo commit callback replacing name-only matched identities.
fn name_callback(names: &[&str], new: &Identity) -> String {
    let targets = names.iter().map(|n| py_bytes(n)).collect::<Vec<_>>().join(", ");
    let new_name = py_bytes(&new.name);
    let new_email = py_bytes(&new.email);
    format!(
        "targets = [{targets}]\n\
         if commit.author_name in targets:\n    \
         commit.author_name = {new_name}\n    \
         commit.author_email = {new_email}\n\
         if commit.committer_name in targets:\n    \
         commit.committer_name = {new_name}\n    \
         commit.committer_email = {new_email}\n"
    )
}

/// Re-add remotes deleted by filter-repo. Failures are ignored so a partial
/// restore never masks a successful rewrite.
pub fn restore_remotes(repo: &Repository, saved: &[(String, String)]) {
    for (name, url) in saved {
        if !repo.has_remote(name) {
            let _ = repo.add_remote(name, url);
        }
    }
}
