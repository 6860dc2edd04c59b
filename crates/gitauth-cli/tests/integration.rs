//! Integration tests for the gitauth CLI.
//!
//! These tests verify the CLI commands work correctly end-to-end against
//! real git repositories. History rewriting is exercised through the
//! `git filter-branch` fallback so the suite does not depend on
//! git-filter-repo being installed.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Helper to create a git repository in a temp directory.
fn setup_git_repo() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");

    StdCommand::new("git")
        .args(["init"])
        .current_dir(&temp)
        .output()
        .expect("Failed to init git repo");

    StdCommand::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(&temp)
        .output()
        .expect("Failed to set git email");

    StdCommand::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(&temp)
        .output()
        .expect("Failed to set git name");

    // Create initial commit so we have a valid HEAD
    let readme = temp.path().join("README.md");
    fs::write(&readme, "# Test Repo\n").expect("Failed to write README");

    StdCommand::new("git")
        .args(["add", "."])
        .current_dir(&temp)
        .output()
        .expect("Failed to git add");

    StdCommand::new("git")
        .args(["commit", "-m", "Initial commit"])
        .current_dir(&temp)
        .output()
        .expect("Failed to create initial commit");

    // Rename branch to main (in case default is master)
    StdCommand::new("git")
        .args(["branch", "-M", "main"])
        .current_dir(&temp)
        .output()
        .expect("Failed to rename branch to main");

    temp
}

/// Helper to create a git commit with an explicit author identity.
fn git_commit_as(name: &str, email: &str, msg: &str, dir: &TempDir) {
    let file = dir.path().join("feature.txt");
    let mut current = fs::read_to_string(&file).unwrap_or_default();
    current.push_str("\nnew line");
    fs::write(&file, &current).expect("Failed to write file");

    StdCommand::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .output()
        .expect("Failed to git add");

    StdCommand::new("git")
        .args([
            "-c",
            &format!("user.name={name}"),
            "-c",
            &format!("user.email={email}"),
            "commit",
            "-m",
            msg,
        ])
        .current_dir(dir)
        .output()
        .expect("Failed to commit");
}

/// Helper to read the author log as `Name <email>` lines.
fn author_log(dir: &TempDir) -> String {
    let output = StdCommand::new("git")
        .args(["log", "--format=%an <%ae>"])
        .current_dir(dir)
        .output()
        .expect("Failed to read git log");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Helper to get gitauth command.
fn gitauth() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gitauth"))
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_version_flag() {
    gitauth()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitauth"));
}

#[test]
fn test_help_flag() {
    gitauth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("authors"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("dry-run"))
        .stdout(predicate::str::contains("rewrite"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("arrange"));
}

#[test]
fn test_no_subcommand_shows_help() {
    gitauth()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_subcommand() {
    gitauth()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

// ============================================================================
// Check command tests
// ============================================================================

#[test]
fn test_check_lists_authors() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);
    git_commit_as("Work Account", "work@company.com", "Fix feature", &temp);

    gitauth()
        .arg("check")
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Test User"))
        .stdout(predicate::str::contains("test@example.com"))
        .stdout(predicate::str::contains("Work Account"))
        .stdout(predicate::str::contains("work@company.com"));
}

#[test]
fn test_check_json_output() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    let output = gitauth()
        .args(["check", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("check --json should produce valid JSON");

    let authors = value["authors"]
        .as_array()
        .expect("JSON should have an authors array");
    assert_eq!(authors.len(), 2, "Both identities should be reported");
    assert!(
        authors
            .iter()
            .any(|a| a["email"] == "work@company.com" && a["commits"] == 1),
        "Work identity should appear with its commit count"
    );
}

#[test]
fn test_check_sorted_by_commit_count() {
    let temp = setup_git_repo();
    git_commit_as("Busy Author", "busy@example.com", "one", &temp);
    git_commit_as("Busy Author", "busy@example.com", "two", &temp);
    git_commit_as("Busy Author", "busy@example.com", "three", &temp);

    let output = gitauth()
        .args(["check", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        value["authors"][0]["email"], "busy@example.com",
        "Most frequent author should sort first"
    );
}

#[test]
fn test_check_outside_git_repo() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    gitauth()
        .arg("check")
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("git repository"));
}

#[test]
fn test_check_empty_repo() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    StdCommand::new("git")
        .args(["init"])
        .current_dir(&temp)
        .output()
        .expect("Failed to init git repo");

    // No commits yet is a warning, not an error
    gitauth()
        .arg("check")
        .current_dir(&temp)
        .assert()
        .success()
        .stderr(predicate::str::contains("no commits"));
}

// ============================================================================
// Dry-run command tests
// ============================================================================

#[test]
fn test_dry_run_requires_filter() {
    let temp = setup_git_repo();

    gitauth()
        .arg("dry-run")
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--old-email"));
}

#[test]
fn test_dry_run_all_commits() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    gitauth()
        .args(["dry-run", "--all"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initial commit"))
        .stdout(predicate::str::contains("Add feature"));
}

#[test]
fn test_dry_run_filters_by_email() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    gitauth()
        .args(["dry-run", "--old-email", "work@company.com"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Add feature"))
        .stdout(predicate::str::contains("Initial commit").not());
}

#[test]
fn test_dry_run_json_output() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);
    git_commit_as("Work Account", "work@company.com", "Fix feature", &temp);

    let output = gitauth()
        .args(["dry-run", "--old-email", "work@company.com", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("dry-run --json should produce valid JSON");
    assert_eq!(value["total"], 2, "Both matching commits should be counted");
}

#[test]
fn test_dry_run_no_matches() {
    let temp = setup_git_repo();

    gitauth()
        .args(["dry-run", "--old-email", "nobody@example.com"])
        .current_dir(&temp)
        .assert()
        .success()
        .stderr(predicate::str::contains("No matching commits"));
}

// ============================================================================
// Rewrite command tests
// ============================================================================

#[test]
fn test_rewrite_changes_author() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    gitauth()
        .args([
            "rewrite",
            "--old-email",
            "work@company.com",
            "--new-name",
            "Personal Account",
            "--new-email",
            "me@example.com",
            "--yes",
            "--no-backup",
        ])
        .current_dir(&temp)
        .assert()
        .success();

    let log = author_log(&temp);
    assert!(
        log.contains("Personal Account <me@example.com>"),
        "Matching commit should carry the new identity: {log}"
    );
    assert!(
        !log.contains("work@company.com"),
        "Old identity should be gone: {log}"
    );
    assert!(
        log.contains("Test User <test@example.com>"),
        "Non-matching commits should be untouched: {log}"
    );
}

#[test]
fn test_rewrite_all_commits() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    gitauth()
        .args([
            "rewrite",
            "--all",
            "--new-name",
            "One Identity",
            "--new-email",
            "one@example.com",
            "--yes",
            "--no-backup",
        ])
        .current_dir(&temp)
        .assert()
        .success();

    let log = author_log(&temp);
    for line in log.lines() {
        assert_eq!(
            line, "One Identity <one@example.com>",
            "Every commit should carry the new identity"
        );
    }
}

#[test]
fn test_rewrite_by_old_name() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    gitauth()
        .args([
            "rewrite",
            "--old-name",
            "Work Account",
            "--new-name",
            "Personal Account",
            "--new-email",
            "me@example.com",
            "--yes",
            "--no-backup",
        ])
        .current_dir(&temp)
        .assert()
        .success();

    let log = author_log(&temp);
    assert!(log.contains("Personal Account <me@example.com>"));
    assert!(!log.contains("Work Account"));
}

#[test]
fn test_rewrite_branch_scoped_leaves_other_branches() {
    let temp = setup_git_repo();

    // Same identity commits on a side branch and on main.
    StdCommand::new("git")
        .args(["checkout", "-b", "side"])
        .current_dir(&temp)
        .output()
        .expect("Failed to create branch");
    git_commit_as("Work Account", "work@company.com", "Side work", &temp);
    StdCommand::new("git")
        .args(["checkout", "main"])
        .current_dir(&temp)
        .output()
        .expect("Failed to checkout main");
    git_commit_as("Work Account", "work@company.com", "Main work", &temp);

    gitauth()
        .args([
            "rewrite",
            "--branch",
            "main",
            "--old-email",
            "work@company.com",
            "--new-name",
            "Personal Account",
            "--new-email",
            "me@example.com",
            "--yes",
            "--no-backup",
        ])
        .current_dir(&temp)
        .assert()
        .success();

    let main_log = {
        let output = StdCommand::new("git")
            .args(["log", "--format=%an <%ae>", "main"])
            .current_dir(&temp)
            .output()
            .expect("Failed to read main log");
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let side_log = {
        let output = StdCommand::new("git")
            .args(["log", "--format=%an <%ae>", "side"])
            .current_dir(&temp)
            .output()
            .expect("Failed to read side log");
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    assert!(
        main_log.contains("Personal Account <me@example.com>"),
        "Targeted branch should be rewritten: {main_log}"
    );
    assert!(
        side_log.contains("Work Account <work@company.com>"),
        "Other branches should be untouched: {side_log}"
    );
}

#[test]
fn test_rewrite_requires_new_identity() {
    let temp = setup_git_repo();

    gitauth()
        .args(["rewrite", "--old-email", "work@company.com", "--yes"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--new-name"));
}

#[test]
fn test_rewrite_refuses_dirty_working_directory() {
    let temp = setup_git_repo();
    fs::write(temp.path().join("README.md"), "# Modified\n").expect("Failed to write");

    gitauth()
        .args([
            "rewrite",
            "--old-email",
            "test@example.com",
            "--new-name",
            "New Name",
            "--new-email",
            "new@example.com",
            "--yes",
            "--no-backup",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not clean"));
}

// ============================================================================
// Backup command tests
// ============================================================================

#[test]
fn test_backup_creates_archive() {
    let temp = setup_git_repo();
    let out = TempDir::new().expect("Failed to create output dir");

    gitauth()
        .args(["backup", "--output"])
        .arg(out.path())
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains(".tar.gz"));

    let archives: Vec<_> = fs::read_dir(out.path())
        .expect("Failed to read output dir")
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tar.gz"))
        .collect();
    assert_eq!(archives.len(), 1, "Exactly one archive should be created");
    let size = archives[0].metadata().expect("Failed to stat archive").len();
    assert!(size > 0, "Archive should not be empty");
}

#[test]
fn test_backup_rejects_unknown_format() {
    let temp = setup_git_repo();

    gitauth()
        .args(["backup", "--format", "rar"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported backup format"));
}

// ============================================================================
// Push command tests
// ============================================================================

#[test]
fn test_push_no_remote() {
    let temp = setup_git_repo();

    gitauth()
        .args(["push", "--force"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote not found"));
}

#[test]
fn test_push_to_local_remote() {
    let temp = setup_git_repo();
    git_commit_as("Work Account", "work@company.com", "Add feature", &temp);

    // A bare clone stands in for the hosted remote
    let remote = TempDir::new().expect("Failed to create remote dir");
    StdCommand::new("git")
        .args(["init", "--bare"])
        .current_dir(&remote)
        .output()
        .expect("Failed to init bare repo");
    StdCommand::new("git")
        .args(["remote", "add", "origin"])
        .arg(remote.path())
        .current_dir(&temp)
        .output()
        .expect("Failed to add remote");

    gitauth()
        .args(["push", "--force"])
        .current_dir(&temp)
        .assert()
        .success();

    let output = StdCommand::new("git")
        .args(["log", "--format=%s", "main"])
        .current_dir(&remote)
        .output()
        .expect("Failed to read remote log");
    let log = String::from_utf8_lossy(&output.stdout);
    assert!(
        log.contains("Add feature"),
        "Remote should have the pushed commits: {log}"
    );
}

// ============================================================================
// Arrange command tests
// ============================================================================

#[test]
fn test_arrange_rejects_invalid_date() {
    let temp = setup_git_repo();
    git_commit_as("Test User", "test@example.com", "Add feature", &temp);

    gitauth()
        .args([
            "arrange",
            "--commits",
            "1",
            "--start-date",
            "not-a-date",
            "--end-date",
            "2024-01-31",
            "--start-time",
            "09:00",
            "--end-time",
            "17:00",
            "--timezone",
            "local",
            "--skip-weekends",
            "--force",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn test_arrange_rejects_reversed_commit_range() {
    let temp = setup_git_repo();
    git_commit_as("Test User", "test@example.com", "Add feature", &temp);

    gitauth()
        .args([
            "arrange",
            "--start-commit",
            "HEAD",
            "--end-commit",
            "HEAD~1",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
            "--start-time",
            "09:00",
            "--end-time",
            "17:00",
            "--timezone",
            "local",
            "--skip-weekends",
            "--force",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ancestor"));
}

#[test]
fn test_arrange_rejects_unknown_revision() {
    let temp = setup_git_repo();

    gitauth()
        .args([
            "arrange",
            "--start-commit",
            "deadbeef",
            "--end-commit",
            "HEAD",
            "--force",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("revision not found"));
}

#[test]
fn test_arrange_rejects_bad_time_window() {
    let temp = setup_git_repo();
    git_commit_as("Test User", "test@example.com", "Add feature", &temp);

    gitauth()
        .args([
            "arrange",
            "--commits",
            "1",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
            "--start-time",
            "17:00",
            "--end-time",
            "09:00",
            "--timezone",
            "local",
            "--skip-weekends",
            "--force",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("end time must be after start time"));
}

#[test]
fn test_arrange_rejects_unknown_timezone() {
    let temp = setup_git_repo();
    git_commit_as("Test User", "test@example.com", "Add feature", &temp);

    gitauth()
        .args([
            "arrange",
            "--commits",
            "1",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
            "--start-time",
            "09:00",
            "--end-time",
            "17:00",
            "--timezone",
            "Mars/Olympus",
            "--skip-weekends",
            "--force",
        ])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown timezone"));
}

// ============================================================================
// Completions command tests
// ============================================================================

#[test]
fn test_completions_bash() {
    gitauth()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

#[test]
fn test_completions_zsh() {
    gitauth()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compdef").or(predicate::str::contains("#compdef")));
}

// ============================================================================
// Config file tests
// ============================================================================

#[test]
fn test_config_default_remote() {
    let temp = setup_git_repo();
    fs::write(
        temp.path().join(".gitauth.toml"),
        "[general]\ndefault_remote = \"upstream\"\n",
    )
    .expect("Failed to write config");
    StdCommand::new("git")
        .args(["add", "."])
        .current_dir(&temp)
        .output()
        .expect("Failed to git add");
    StdCommand::new("git")
        .args(["commit", "-m", "Add config"])
        .current_dir(&temp)
        .output()
        .expect("Failed to commit config");

    // The configured remote does not exist, so the error names it
    gitauth()
        .args(["push", "--force"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("upstream"));
}

#[test]
fn test_config_invalid_toml() {
    let temp = setup_git_repo();
    fs::write(temp.path().join(".gitauth.toml"), "not [ valid toml").expect("Failed to write");

    gitauth()
        .args(["backup", "--format", "tar.gz"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("toml"));
}
