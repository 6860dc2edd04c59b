//! `gitauth rewrite` command - the destructive history rewrite.

use std::fmt;

use anyhow::{Context, Result, bail};
use gitauth_core::{
    Author, BackupFormat, Identity, OldIdentity, RewritePlan, Selection, create_backup,
    detect_authors,
};
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, MultiSelect, Select, Text};

use crate::commands::{RewriteArgs, utils};
use crate::output;

/// An author entry as rendered in selection prompts.
#[derive(Clone)]
struct AuthorOption(Author);

impl fmt::Display for AuthorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> ({} commit{})",
            self.0.name,
            self.0.email,
            self.0.commits,
            if self.0.commits == 1 { "" } else { "s" }
        )
    }
}

/// Multi-select over detected authors.
pub(crate) fn select_authors(prompt: &str, authors: &[Author]) -> Result<Vec<Author>> {
    let options: Vec<AuthorOption> = authors.iter().cloned().map(AuthorOption).collect();
    let picked = MultiSelect::new(prompt, options)
        .prompt()
        .context("Author selection failed")?;
    Ok(picked.into_iter().map(|o| o.0).collect())
}

/// Reject empty prompt input.
fn non_empty(input: &str) -> std::result::Result<Validation, inquire::CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid(ErrorMessage::Custom(
            "a value is required".to_string(),
        )))
    } else {
        Ok(Validation::Valid)
    }
}

/// Interactively choose the replacement identity: pick one of the existing
/// authors, or enter new details (defaulting to `git config user.*`).
fn choose_new_identity(
    repo: &gitauth_git::Repository,
    authors: &[Author],
) -> Result<Identity> {
    const FROM_EXISTING: &str = "Select from existing authors";
    const ENTER_NEW: &str = "Enter new author details";

    let choice = Select::new("New identity:", vec![FROM_EXISTING, ENTER_NEW])
        .prompt()
        .context("Identity selection failed")?;

    if choice == FROM_EXISTING {
        let options: Vec<AuthorOption> = authors.iter().cloned().map(AuthorOption).collect();
        let picked = Select::new("Select new author:", options)
            .prompt()
            .context("Identity selection failed")?;
        return Ok(Identity {
            name: picked.0.name,
            email: picked.0.email,
        });
    }

    let name = Text::new("New author name:")
        .with_default(&repo.config_get("user.name"))
        .with_validator(non_empty)
        .prompt()
        .context("Prompt failed")?;
    let email = Text::new("New author email:")
        .with_default(&repo.config_get("user.email"))
        .with_validator(non_empty)
        .prompt()
        .context("Prompt failed")?;

    Ok(Identity {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
    })
}

/// Run the rewrite command.
pub fn run(args: &RewriteArgs) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config(args.path.as_deref())?;

    if !repo.has_commits() {
        output::warn("Repository has no commits yet");
        return Ok(());
    }
    repo.require_clean()?;

    let branch = args.branch.as_deref();
    let all = args.all || args.map_all;

    // Resolve what to rewrite and what to write instead.
    let (selection, new) = if args.choose_old {
        let authors = detect_authors(&repo, branch)?;
        if authors.is_empty() {
            output::warn("No authors found to choose from");
            return Ok(());
        }

        let chosen = select_authors("Select author(s) to rewrite:", &authors)?;
        if chosen.is_empty() {
            bail!("No authors selected");
        }

        let new = match (&args.new_name, &args.new_email) {
            (Some(name), Some(email)) => Identity {
                name: name.clone(),
                email: email.clone(),
            },
            _ => choose_new_identity(&repo, &authors)?,
        };

        let olds = chosen
            .into_iter()
            .map(|a| OldIdentity {
                name: Some(a.name),
                email: Some(a.email),
            })
            .collect();
        (Selection::Authors(olds), new)
    } else {
        if !all && args.old_email.is_none() && args.old_name.is_none() {
            bail!("Specify --old-email, --old-name, --all, or --choose-old");
        }
        let (Some(name), Some(email)) = (&args.new_name, &args.new_email) else {
            bail!("--new-name and --new-email are required (unless using --choose-old)");
        };
        let new = Identity {
            name: name.clone(),
            email: email.clone(),
        };

        let selection = if all {
            Selection::All
        } else {
            Selection::Authors(vec![OldIdentity {
                name: args.old_name.clone(),
                email: args.old_email.clone(),
            }])
        };
        (selection, new)
    };

    let plan = RewritePlan { selection, new };
    print_plan(&plan);

    let affected = plan.count_affected(&repo, branch)?;
    output::warn(&format!(
        "This will affect approximately {affected} commit(s)"
    ));
    output::warn("This will rewrite Git history! This is a destructive operation.");

    if args.no_backup {
        output::debug("Skipping backup (--no-backup)");
    } else {
        output::info("Creating backup before rewriting...");
        let format: BackupFormat = config.general.backup_format.parse()?;
        let backup_path = create_backup(&repo, None, format)?;
        output::detail(&format!("  Backup saved to: {}", backup_path.display()));
    }

    if !args.yes {
        let proceed = Confirm::new("Do you want to proceed?")
            .with_default(false)
            .prompt()
            .context("Confirmation failed")?;
        if !proceed {
            output::info("Aborted");
            return Ok(());
        }
    }

    output::info("Rewriting history...");
    if repo.filter_repo_available() {
        output::debug("Using git filter-repo");
    } else {
        output::debug("git-filter-repo not found, falling back to git filter-branch");
    }
    plan.execute(&repo, branch)?;

    output::success("History rewritten successfully!");
    output::detail("\nNext steps:");
    output::detail("  1. Verify the changes: git log");
    output::detail("  2. Force push to the remote: gitauth push");
    output::detail("  3. Notify collaborators to re-clone the repository");
    Ok(())
}

/// Print the resolved rewrite configuration.
fn print_plan(plan: &RewritePlan) {
    output::info("Rewrite configuration:");
    match &plan.selection {
        Selection::All => output::detail("  Mode: rewrite ALL commits"),
        Selection::Authors(olds) => {
            output::detail(&format!("  Mode: rewrite {} identity(ies)", olds.len()));
            for old in olds {
                let shown = match (&old.name, &old.email) {
                    (Some(n), Some(e)) => format!("{n} <{e}>"),
                    (Some(n), None) => format!("{n} (any email)"),
                    (None, Some(e)) => format!("<{e}> (any name)"),
                    (None, None) => "(unmatched)".to_string(),
                };
                output::detail(&format!("    - {shown}"));
            }
        }
    }
    output::detail(&format!(
        "  New identity: {}",
        output::identity(&plan.new.name, &plan.new.email)
    ));
}
