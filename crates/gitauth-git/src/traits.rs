//! Trait abstraction over the git inspection surface.

use crate::Result;

/// Read-only git queries consumed by core logic.
///
/// Implemented by [`crate::Repository`] via subprocess calls; mock
/// implementations back the core crate's unit tests so author detection and
/// schedule calculation can be exercised without a real repository. Output is
/// the raw `git` text; parsing lives with the callers so the parsers stay
/// testable against fixed strings.
pub trait GitOps {
    /// `git log --format=%an%x09%ae`, for the given branch or all refs.
    fn log_authors(&self, branch: Option<&str>) -> Result<String>;

    /// `git log --format=%H%x09%an%x09%ae%x09%s`, for the given branch or all refs.
    fn log_commits(&self, branch: Option<&str>) -> Result<String>;

    /// `git show --numstat --format= <rev>`, used to weight commits by size.
    fn show_numstat(&self, rev: &str) -> Result<String>;
}
