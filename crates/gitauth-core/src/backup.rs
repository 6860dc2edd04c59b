//! Repository backups.
//!
//! Snapshots the whole repository directory (working tree included) into a
//! timestamped archive before history is rewritten. Archive encoding is
//! delegated to the system `tar` / `zip` tools; this module only builds their
//! argument lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use chrono::{DateTime, Local};
use gitauth_git::Repository;

use crate::error::{Error, Result};

/// Supported backup archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupFormat {
    /// Gzip-compressed tarball (default).
    TarGz,
    /// Zip archive.
    Zip,
}

impl BackupFormat {
    /// File extension for archive names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// The external tool that produces this format.
    #[must_use]
    pub const fn tool(self) -> &'static str {
        match self {
            Self::TarGz => "tar",
            Self::Zip => "zip",
        }
    }
}

impl FromStr for BackupFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            "zip" => Ok(Self::Zip),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Archive file name: `<repo>-backup-<YYYYmmdd-HHMMSS>.<ext>`.
#[must_use]
pub fn archive_name(repo_name: &str, format: BackupFormat, now: &DateTime<Local>) -> String {
    format!(
        "{repo_name}-backup-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Argument list for the archiver.
///
/// Both tools are run with the repository's parent as working directory so
/// the archive contains a single top-level directory entry.
#[must_use]
pub fn archive_args(format: BackupFormat, output: &Path, dir_name: &str) -> Vec<String> {
    match format {
        BackupFormat::TarGz => vec![
            "-czf".to_string(),
            output.display().to_string(),
            dir_name.to_string(),
        ],
        BackupFormat::Zip => vec![
            "-r".to_string(),
            "-q".to_string(),
            output.display().to_string(),
            dir_name.to_string(),
        ],
    }
}

/// Create a backup archive of the repository.
///
/// `output_dir` defaults to the repository's parent directory and is created
/// if missing. Returns the path of the written archive.
///
/// # Errors
/// Returns an error if the archive tool is missing, the output directory
/// cannot be created, or the tool exits non-zero.
pub fn create_backup(
    repo: &Repository,
    output_dir: Option<&Path>,
    format: BackupFormat,
) -> Result<PathBuf> {
    let tool = format.tool();
    if which::which(tool).is_err() {
        return Err(Error::ArchiveToolMissing(tool.to_string()));
    }

    let root = repo.workdir();
    let parent = root.parent().unwrap_or(root);
    let out_dir = output_dir.unwrap_or(parent);
    fs::create_dir_all(out_dir)?;
    let out_dir = out_dir.canonicalize()?;

    let output = out_dir.join(archive_name(&repo.name(), format, &Local::now()));
    let args = archive_args(format, &output, &repo.name());

    let out = Command::new(tool).args(&args).current_dir(parent).output()?;
    if !out.status.success() {
        return Err(Error::ArchiveFailed {
            tool: tool.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
