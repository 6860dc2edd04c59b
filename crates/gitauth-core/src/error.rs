//! Error types for gitauth-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitauth-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A time value was not in `HH:MM` form.
    #[error("invalid time '{0}': use HH:MM")]
    InvalidTime(String),

    /// A date value could not be parsed.
    #[error("invalid date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),

    /// Daily end time is not after the start time.
    #[error("end time must be after start time")]
    InvalidTimeWindow,

    /// Date range contains no usable days.
    #[error("no valid days in the specified range (check dates and weekend settings)")]
    NoValidDays,

    /// Timezone string not understood.
    #[error(
        "unknown timezone '{0}': use 'local', 'UTC', a fixed offset like '+05:30', \
         or an IANA name like 'Asia/Karachi'"
    )]
    UnknownTimezone(String),

    /// Nothing to schedule.
    #[error("no commits found in range")]
    EmptyRange,

    /// Backup format other than the supported ones.
    #[error("unsupported backup format '{0}': use 'tar.gz' or 'zip'")]
    UnsupportedFormat(String),

    /// Archive tool missing from PATH.
    #[error("`{0}` not found in PATH - install it or choose another backup format")]
    ArchiveToolMissing(String),

    /// Archive tool exited non-zero.
    #[error("`{tool}` failed: {stderr}")]
    ArchiveFailed {
        /// The archiver that failed (`tar` or `zip`).
        tool: String,
        /// Trimmed stderr from the process.
        stderr: String,
    },

    /// The `git-filter-repo` plugin is required but not installed.
    #[error("git-filter-repo is required - install it with `pip install git-filter-repo`")]
    FilterRepoMissing,

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Git operation error.
    #[error(transparent)]
    Git(#[from] gitauth_git::Error),
}
