//! Repository wrapper delegating to the `git` command-line tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::traits::GitOps;

/// Handle to a git repository, addressed by its worktree root.
///
/// All operations shell out to `git` with the repository root as the working
/// directory. History rewrites themselves are delegated to
/// `git filter-repo` / `git filter-branch`; this type only sequences and
/// validates those invocations.
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    git_dir: PathBuf,
}

/// Render a command line for error messages.
fn render(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Run a command, capturing stdout. Non-zero exit becomes [`Error::CommandFailed`].
fn run_captured(cmd: &mut Command) -> Result<String> {
    let rendered = render(cmd);
    let out = cmd.output()?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
    } else {
        Err(Error::CommandFailed {
            command: rendered,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}

/// Run a command with inherited stdio so the user sees git's own output.
fn run_inherited(cmd: &mut Command) -> Result<()> {
    let rendered = render(cmd);
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: rendered,
            stderr: format!("exited with {status}"),
        })
    }
}

impl Repository {
    /// Discover the repository containing `path` (or the current directory).
    ///
    /// # Errors
    /// Returns [`Error::GitNotFound`] if `git` is not on PATH, or
    /// [`Error::NotARepository`] if no repository contains `path`.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if which::which("git").is_err() {
            return Err(Error::GitNotFound);
        }

        let mut cmd = Command::new("git");
        cmd.args(["rev-parse", "--show-toplevel"]);
        if let Some(p) = path {
            cmd.current_dir(p);
        }
        let root = run_captured(&mut cmd).map_err(|_| {
            Error::NotARepository(
                path.map_or_else(|| ".".to_string(), |p| p.display().to_string()),
            )
        })?;
        let root = PathBuf::from(root);

        let mut cmd = Command::new("git");
        cmd.args(["rev-parse", "--git-dir"]).current_dir(&root);
        let git_dir = PathBuf::from(run_captured(&mut cmd)?);
        let git_dir = if git_dir.is_absolute() {
            git_dir
        } else {
            root.join(git_dir)
        };

        Ok(Self { root, git_dir })
    }

    /// Path to the worktree root.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.root
    }

    /// Path to the `.git` directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Repository directory name, used for backup archives and prompts.
    #[must_use]
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map_or_else(|| "repository".to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// A `git` command rooted at the repository.
    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root);
        cmd
    }

    // === Repository state ===

    /// Whether the repository has at least one commit.
    #[must_use]
    pub fn has_commits(&self) -> bool {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--verify", "--quiet", "HEAD"]);
        run_captured(&mut cmd).is_ok()
    }

    /// Require at least one commit.
    ///
    /// # Errors
    /// Returns [`Error::NoCommits`] on an empty repository.
    pub fn require_commits(&self) -> Result<()> {
        if self.has_commits() {
            Ok(())
        } else {
            Err(Error::NoCommits)
        }
    }

    /// Whether the working tree and index are clean.
    ///
    /// # Errors
    /// Returns an error if `git status` fails.
    pub fn is_clean(&self) -> Result<bool> {
        let mut cmd = self.git();
        cmd.args(["status", "--porcelain"]);
        Ok(run_captured(&mut cmd)?.is_empty())
    }

    /// Require a clean working tree.
    ///
    /// # Errors
    /// Returns [`Error::DirtyWorkingDirectory`] if there are uncommitted changes.
    pub fn require_clean(&self) -> Result<()> {
        if self.is_clean()? {
            Ok(())
        } else {
            Err(Error::DirtyWorkingDirectory)
        }
    }

    /// Name of the current branch.
    ///
    /// # Errors
    /// Returns [`Error::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);
        let name = run_captured(&mut cmd)?;
        if name == "HEAD" {
            Err(Error::DetachedHead)
        } else {
            Ok(name)
        }
    }

    /// Read a local git config value; missing keys yield an empty string.
    #[must_use]
    pub fn config_get(&self, key: &str) -> String {
        let mut cmd = self.git();
        cmd.args(["config", "--get", key]);
        run_captured(&mut cmd).unwrap_or_default()
    }

    // === Remotes ===

    /// Whether a remote with this name exists.
    #[must_use]
    pub fn has_remote(&self, name: &str) -> bool {
        let mut cmd = self.git();
        cmd.args(["remote", "get-url", name]);
        run_captured(&mut cmd).is_ok()
    }

    /// Fetch URL of a remote.
    ///
    /// # Errors
    /// Returns [`Error::RemoteNotFound`] if the remote does not exist.
    pub fn remote_url(&self, name: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["remote", "get-url", name]);
        run_captured(&mut cmd).map_err(|_| Error::RemoteNotFound(name.to_string()))
    }

    /// List remotes as `(name, url)` pairs, one entry per remote.
    ///
    /// # Errors
    /// Returns an error if `git remote -v` fails.
    pub fn remotes(&self) -> Result<Vec<(String, String)>> {
        let mut cmd = self.git();
        cmd.args(["remote", "-v"]);
        let out = run_captured(&mut cmd)?;

        let mut seen: Vec<(String, String)> = Vec::new();
        for line in out.lines() {
            let mut parts = line.split_whitespace();
            if let (Some(name), Some(url)) = (parts.next(), parts.next()) {
                if !seen.iter().any(|(n, _)| n == name) {
                    seen.push((name.to_string(), url.to_string()));
                }
            }
        }
        Ok(seen)
    }

    /// Add a remote. Used to restore remotes that `git filter-repo` removes.
    ///
    /// # Errors
    /// Returns an error if `git remote add` fails.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["remote", "add", name, url]);
        run_captured(&mut cmd).map(|_| ())
    }

    // === Revisions ===

    /// Resolve a revision to a full commit hash.
    ///
    /// # Errors
    /// Returns [`Error::RevNotFound`] if the revision cannot be resolved.
    pub fn rev_parse_verify(&self, rev: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--verify", &format!("{rev}^{{commit}}")]);
        run_captured(&mut cmd).map_err(|_| Error::RevNotFound(rev.to_string()))
    }

    /// Whether `ancestor` is an ancestor of `descendant`.
    ///
    /// # Errors
    /// Returns an error if the check itself fails (not when the answer is no).
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let mut cmd = self.git();
        cmd.args(["merge-base", "--is-ancestor", ancestor, descendant]);
        let rendered = render(&cmd);
        let out = cmd.output()?;
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::CommandFailed {
                command: rendered,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
        }
    }

    /// Whether a revision has a parent commit (false for root commits).
    #[must_use]
    pub fn has_parent(&self, rev: &str) -> bool {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--verify", "--quiet", &format!("{rev}^")]);
        run_captured(&mut cmd).is_ok()
    }

    /// List commit hashes in a log range, newest first.
    ///
    /// # Errors
    /// Returns an error if `git log` rejects the range.
    pub fn rev_list(&self, range: &str) -> Result<Vec<String>> {
        let mut cmd = self.git();
        cmd.args(["log", "--format=%H", range]);
        let out = run_captured(&mut cmd)?;
        Ok(out.lines().map(str::to_string).collect())
    }

    // === Delegated mutations ===

    /// Push the current branch with `--force-with-lease`.
    ///
    /// # Errors
    /// Returns an error if the push is rejected or fails.
    pub fn push_force_with_lease(&self, remote: &str, branch: &str) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["push", "--force-with-lease", remote, branch]);
        run_inherited(&mut cmd)
    }

    /// Whether the `git-filter-repo` plugin is installed.
    #[must_use]
    pub fn filter_repo_available(&self) -> bool {
        if which::which("git-filter-repo").is_ok() {
            return true;
        }
        let mut cmd = self.git();
        cmd.args(["filter-repo", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd.status().map(|s| s.success()).unwrap_or(false)
    }

    /// Run `git filter-repo` with the given arguments.
    ///
    /// # Errors
    /// Returns an error if filter-repo exits non-zero.
    pub fn filter_repo(&self, args: &[String]) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("filter-repo").args(args);
        run_inherited(&mut cmd)
    }

    /// Run `git filter-branch` with an `--env-filter` script.
    ///
    /// Rewrites the given branch, or all branches and tags when `branch` is
    /// `None`. The deprecation warning is squelched; this path is only taken
    /// when filter-repo is not installed.
    ///
    /// # Errors
    /// Returns an error if filter-branch exits non-zero.
    pub fn filter_branch(&self, env_filter: &str, branch: Option<&str>) -> Result<()> {
        let mut cmd = self.git();
        cmd.env("FILTER_BRANCH_SQUELCH_WARNING", "1");
        cmd.args(["filter-branch", "-f", "--env-filter", env_filter]);
        cmd.args(["--tag-name-filter", "cat", "--"]);
        match branch {
            Some(b) => {
                cmd.arg(b);
            }
            None => {
                cmd.args(["--branches", "--tags"]);
            }
        }
        run_inherited(&mut cmd)
    }
}

impl GitOps for Repository {
    fn log_authors(&self, branch: Option<&str>) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["log", "--format=%an%x09%ae"]);
        match branch {
            Some(b) => {
                cmd.arg(b);
            }
            None => {
                cmd.arg("--all");
            }
        }
        run_captured(&mut cmd)
    }

    fn log_commits(&self, branch: Option<&str>) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["log", "--format=%H%x09%an%x09%ae%x09%s"]);
        match branch {
            Some(b) => {
                cmd.arg(b);
            }
            None => {
                cmd.arg("--all");
            }
        }
        run_captured(&mut cmd)
    }

    fn show_numstat(&self, rev: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["show", "--numstat", "--format=", rev]);
        run_captured(&mut cmd)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .expect("failed to run git");
        assert!(status.success(), "git {args:?} failed");
    }

    fn setup_repo() -> TempDir {
        let temp = TempDir::new().expect("temp dir");
        git(temp.path(), &["init"]);
        git(temp.path(), &["config", "user.name", "Test User"]);
        git(temp.path(), &["config", "user.email", "test@example.com"]);
        temp
    }

    fn commit(dir: &Path, file: &str, author: &str, email: &str) {
        fs::write(dir.join(file), file).expect("write file");
        git(dir, &["add", "."]);
        git(
            dir,
            &[
                "-c",
                &format!("user.name={author}"),
                "-c",
                &format!("user.email={email}"),
                "commit",
                "-m",
                &format!("add {file}"),
            ],
        );
    }

    #[test]
    fn discover_fails_outside_repo() {
        let temp = TempDir::new().unwrap();
        let err = Repository::discover(Some(temp.path())).unwrap_err();
        assert!(matches!(err, Error::NotARepository(_)));
    }

    #[test]
    fn empty_repo_has_no_commits() {
        let temp = setup_repo();
        let repo = Repository::discover(Some(temp.path())).unwrap();
        assert!(!repo.has_commits());
        assert!(matches!(repo.require_commits(), Err(Error::NoCommits)));
    }

    #[test]
    fn clean_and_dirty_detection() {
        let temp = setup_repo();
        commit(temp.path(), "a.txt", "Alice", "alice@example.com");
        let repo = Repository::discover(Some(temp.path())).unwrap();
        assert!(repo.is_clean().unwrap());

        fs::write(temp.path().join("a.txt"), "changed").unwrap();
        assert!(!repo.is_clean().unwrap());
        assert!(matches!(
            repo.require_clean(),
            Err(Error::DirtyWorkingDirectory)
        ));
    }

    #[test]
    fn log_authors_lists_each_commit() {
        let temp = setup_repo();
        commit(temp.path(), "a.txt", "Alice", "alice@example.com");
        commit(temp.path(), "b.txt", "Bob", "bob@example.com");
        let repo = Repository::discover(Some(temp.path())).unwrap();

        let out = repo.log_authors(None).unwrap();
        assert!(out.contains("Alice\talice@example.com"));
        assert!(out.contains("Bob\tbob@example.com"));
    }

    #[test]
    fn rev_parse_and_ancestry() {
        let temp = setup_repo();
        commit(temp.path(), "a.txt", "Alice", "alice@example.com");
        commit(temp.path(), "b.txt", "Alice", "alice@example.com");
        let repo = Repository::discover(Some(temp.path())).unwrap();

        let head = repo.rev_parse_verify("HEAD").unwrap();
        let root = repo.rev_parse_verify("HEAD~1").unwrap();
        assert_eq!(head.len(), 40);
        assert!(repo.is_ancestor(&root, &head).unwrap());
        assert!(!repo.is_ancestor(&head, &root).unwrap());
        assert!(repo.has_parent(&head));
        assert!(!repo.has_parent(&root));
        assert!(matches!(
            repo.rev_parse_verify("no-such-rev"),
            Err(Error::RevNotFound(_))
        ));
    }

    #[test]
    fn remotes_roundtrip() {
        let temp = setup_repo();
        commit(temp.path(), "a.txt", "Alice", "alice@example.com");
        let repo = Repository::discover(Some(temp.path())).unwrap();

        assert!(!repo.has_remote("origin"));
        repo.add_remote("origin", "https://example.com/repo.git")
            .unwrap();
        assert!(repo.has_remote("origin"));
        assert_eq!(
            repo.remote_url("origin").unwrap(),
            "https://example.com/repo.git"
        );
        assert_eq!(
            repo.remotes().unwrap(),
            vec![(
                "origin".to_string(),
                "https://example.com/repo.git".to_string()
            )]
        );
        assert!(matches!(
            repo.remote_url("upstream"),
            Err(Error::RemoteNotFound(_))
        ));
    }
}
