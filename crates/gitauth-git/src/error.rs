//! Error types for gitauth-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `git` executable is not on PATH.
    #[error("`git` not found in PATH")]
    GitNotFound,

    /// Not inside a git repository.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Repository has no commits yet.
    #[error("repository has no commits yet")]
    NoCommits,

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// Working directory has uncommitted changes.
    #[error("working directory is not clean - commit or stash your changes first")]
    DirtyWorkingDirectory,

    /// Remote not found.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// A revision could not be resolved.
    #[error("revision not found: {0}")]
    RevNotFound(String),

    /// A spawned command exited non-zero.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Trimmed stderr from the process.
        stderr: String,
    },

    /// IO error while spawning a process.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
