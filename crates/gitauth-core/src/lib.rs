//! # gitauth-core
//!
//! Domain logic for gitauth: author detection from `git log` output, mailmap
//! construction, rewrite backend planning (`git filter-repo` with a
//! `git filter-branch` fallback), repository backups, and commit-date
//! arrangement scheduling. All history mutation is delegated to external git
//! commands; this crate only builds their inputs and sequences them.

pub mod arrange;
pub mod author;
pub mod backup;
pub mod config;
pub mod error;
pub mod mailmap;
pub mod rewrite;

pub use arrange::{ArrangeParams, ScheduledCommit, Zone, apply_schedule, calculate_schedule};
pub use author::{Author, Commit, detect_authors, find_commits};
pub use backup::{BackupFormat, create_backup};
pub use config::Config;
pub use error::{Error, Result};
pub use mailmap::Mailmap;
pub use rewrite::{Identity, OldIdentity, RewritePlan, Selection, restore_remotes};
