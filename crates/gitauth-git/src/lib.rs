//! # gitauth-git
//!
//! Git access layer for gitauth, built on subprocess invocations of the
//! `git` command-line tool. Provides repository discovery, read-only
//! inspection (authors, commits, remotes, ancestry), and delegation to the
//! external history-rewriting mechanisms (`git filter-repo`,
//! `git filter-branch`, `git push --force-with-lease`).

mod error;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use repository::Repository;
pub use traits::GitOps;
