//! Integration tests for the tutor CLI.
//!
//! These tests verify the CLI commands work correctly end-to-end against
//! real repositories built in temp directories.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Helper to run a git command in a temp repository.
fn git(args: &[&str], dir: &TempDir) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Helper to create a git repository in a temp directory.
fn setup_git_repo() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");

    git(&["init"], &temp);
    git(&["config", "user.email", "test@example.com"], &temp);
    git(&["config", "user.name", "Test User"], &temp);

    // Create initial commit so we have a valid HEAD
    let readme = temp.path().join("README.md");
    fs::write(&readme, "# Test Repo\n").expect("Failed to write README");
    git(&["add", "."], &temp);
    git(&["commit", "-m", "Initial commit"], &temp);

    // Rename branch to main (in case default is master)
    git(&["branch", "-M", "main"], &temp);

    temp
}

/// Helper to create a commit touching a branch-specific file.
fn git_commit(file: &str, msg: &str, dir: &TempDir) {
    let path = dir.path().join(file);
    let mut current = fs::read_to_string(&path).unwrap_or_default();
    current.push_str("\nnew line");
    fs::write(&path, &current).expect("Failed to write file");

    git(&["add", "."], dir);
    git(&["commit", "-m", msg], dir);
}

/// Helper to get the tutor command.
fn tutor() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tutor"))
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_version_flag() {
    tutor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tutor"));
}

#[test]
fn test_help_lists_commands() {
    tutor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("branch"))
        .stdout(predicate::str::contains("tags"));
}

#[test]
fn test_completions() {
    tutor()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tutor"));
}

#[test]
fn test_graph_outside_repository_fails() {
    let temp = TempDir::new().unwrap();

    tutor()
        .arg("graph")
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("git"));
}

// ============================================================================
// Graph reconstruction
// ============================================================================

#[test]
fn test_graph_linear_history() {
    let temp = setup_git_repo();
    git_commit("a.txt", "second", &temp);
    git_commit("a.txt", "third", &temp);

    tutor()
        .arg("graph")
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("branch path"));
}

#[test]
fn test_graph_dot_output() {
    let temp = setup_git_repo();
    git_commit("a.txt", "second", &temp);

    tutor()
        .args(["graph", "--dot"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("strict digraph"))
        .stdout(predicate::str::contains("(main)"));
}

#[test]
fn test_graph_json_output() {
    let temp = setup_git_repo();
    git_commit("a.txt", "second", &temp);

    let assert = tutor()
        .args(["graph", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(parsed["branch_paths"].is_array());
    assert!(parsed["refs"]["main"].is_string());
}

// ============================================================================
// Branch attribution
// ============================================================================

/// Build main -> c1, feature -> f1, f2 forked at c1.
fn setup_feature_branch() -> TempDir {
    let temp = setup_git_repo();
    git(&["checkout", "-b", "feature"], &temp);
    git_commit("feature.txt", "feature work 1", &temp);
    git_commit("feature.txt", "feature work 2", &temp);
    git(&["checkout", "main"], &temp);
    temp
}

#[test]
fn test_branch_unmerged() {
    let temp = setup_feature_branch();

    tutor()
        .args(["branch", "feature", "--base", "main"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit on 'feature'"))
        .stdout(predicate::str::contains("not merged into 'main'"));
}

#[test]
fn test_branch_merged() {
    let temp = setup_feature_branch();
    git(&["merge", "--no-ff", "feature", "-m", "Merge feature"], &temp);

    tutor()
        .args(["branch", "feature", "--base", "main"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit on 'feature'"))
        .stdout(predicate::str::contains("merged into 'main' at"));
}

#[test]
fn test_branch_merged_json() {
    let temp = setup_feature_branch();
    git(&["merge", "--no-ff", "feature", "-m", "Merge feature"], &temp);

    let assert = tutor()
        .args(["branch", "feature", "--base", "main", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(parsed["first_commit"].is_string());
    assert!(parsed["merge_point"].is_string());
    assert_eq!(parsed["fast_forward"], false);
}

#[test]
fn test_branch_fast_forward() {
    let temp = setup_feature_branch();
    git(&["merge", "--ff-only", "feature"], &temp);

    let assert = tutor()
        .args(["branch", "feature", "--base", "main", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    // Fast-forward: the merge point is the feature tip, not the first
    // feature commit.
    assert_eq!(parsed["fast_forward"], true);
    assert!(parsed["merge_point"].is_string());
    assert_ne!(parsed["merge_point"], parsed["first_commit"]);
}

#[test]
fn test_branch_missing_fails() {
    let temp = setup_git_repo();

    tutor()
        .args(["branch", "ghost", "--base", "main"])
        .current_dir(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

// ============================================================================
// Temporal tag reconstruction
// ============================================================================

#[test]
fn test_tags_at_date() {
    let temp = setup_git_repo();
    git(&["tag", "v1"], &temp);

    // Local repositories have no event log, so the current tag set is the
    // answer for any date.
    tutor()
        .args(["tags", "--at", "2020-01-01T00:00:00Z"])
        .current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("v1"));
}

#[test]
fn test_tags_json() {
    let temp = setup_git_repo();
    git(&["tag", "v1"], &temp);
    git(&["tag", "v2"], &temp);

    let assert = tutor()
        .args(["tags", "--at", "2020-01-01T00:00:00Z", "--json"])
        .current_dir(&temp)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["tags"].as_array().unwrap().len(), 2);
}
