//! Listing and applying quick fixes through the `amplify-doctor` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn doctor(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("amplify-doctor").unwrap();
    cmd.env("HOME", home.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_stdout(assert: assert_cmd::assert::Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

#[test]
fn list_shows_fixes_for_a_known_pattern() {
    let home = TempDir::new().unwrap();

    let assert = doctor(&home)
        .args(["fixes", "list", "NODE_VERSION_MISMATCH"])
        .assert()
        .success();
    let report = json_stdout(assert);

    assert_eq!(report["patternId"], "NODE_VERSION_MISMATCH");
    let fixes = report["fixes"].as_array().unwrap();
    assert_eq!(fixes[0]["id"], "add-nvmrc");
    assert_eq!(fixes[0]["action"]["kind"], "fileCreate");
    assert_eq!(fixes[1]["id"], "install-pinned-node");
}

#[test]
fn list_is_empty_for_unknown_patterns() {
    let home = TempDir::new().unwrap();

    let assert = doctor(&home)
        .args(["fixes", "list", "SOMETHING_ELSE"])
        .assert()
        .success();
    let report = json_stdout(assert);
    assert!(report["fixes"].as_array().unwrap().is_empty());
}

#[test]
fn apply_creates_the_nvmrc_file() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    let assert = doctor(&home)
        .args(["fixes", "apply", "NODE_VERSION_MISMATCH", "--fix", "add-nvmrc", "--root"])
        .arg(project.path())
        .assert()
        .success();
    let report = json_stdout(assert);

    assert_eq!(report["result"], "created");
    assert_eq!(fs::read_to_string(project.path().join(".nvmrc")).unwrap(), "18\n");

    // a second apply refuses to clobber unless --overwrite is given
    doctor(&home)
        .args(["fixes", "apply", "NODE_VERSION_MISMATCH", "--fix", "add-nvmrc", "--root"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    doctor(&home)
        .args([
            "fixes",
            "apply",
            "NODE_VERSION_MISMATCH",
            "--fix",
            "add-nvmrc",
            "--overwrite",
            "--root",
        ])
        .arg(project.path())
        .assert()
        .success();
}

#[test]
fn confirmation_gate_blocks_file_deletion_without_yes() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let lockfile = project.path().join("package-lock.json");
    fs::write(&lockfile, "{}").unwrap();

    doctor(&home)
        .args([
            "fixes",
            "apply",
            "LOCK_FILE_MISMATCH",
            "--fix",
            "remove-stray-npm-lockfile",
            "--root",
        ])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    assert!(lockfile.exists()); // nothing was deleted

    let assert = doctor(&home)
        .args([
            "fixes",
            "apply",
            "LOCK_FILE_MISMATCH",
            "--fix",
            "remove-stray-npm-lockfile",
            "-y",
            "--root",
        ])
        .arg(project.path())
        .assert()
        .success();
    assert_eq!(json_stdout(assert)["result"], "deleted");
    assert!(!lockfile.exists());
}

#[test]
fn modify_settles_into_no_change_on_reapply() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("amplify.yml"),
        "preBuild:\n  - npm ci\n",
    )
    .unwrap();

    let apply = |home: &TempDir| {
        doctor(home)
            .args([
                "fixes",
                "apply",
                "LOCK_FILE_MISMATCH",
                "--fix",
                "switch-buildspec-to-pnpm",
                "-y",
                "--root",
            ])
            .arg(project.path())
            .assert()
            .success()
    };

    assert_eq!(json_stdout(apply(&home))["result"], "modified");
    let body = fs::read_to_string(project.path().join("amplify.yml")).unwrap();
    assert!(body.contains("pnpm install --frozen-lockfile"));
    assert!(!body.contains("npm ci"));

    assert_eq!(json_stdout(apply(&home))["result"], "noChangeNeeded");
}

#[test]
fn terminal_fix_only_hands_back_the_command() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    let assert = doctor(&home)
        .args(["fixes", "apply", "NPM_CI_FAILURE", "--fix", "regenerate-lockfile", "--root"])
        .arg(project.path())
        .assert()
        .success();
    let report = json_stdout(assert);

    assert_eq!(report["result"], "commandSuggested");
    assert_eq!(report["command"], "npm install --package-lock-only");
    // the command was suggested, never run
    assert_eq!(fs::read_dir(project.path()).unwrap().count(), 0);
}

#[test]
fn text_format_prints_the_command_to_run() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    doctor(&home)
        .args([
            "-f",
            "text",
            "fixes",
            "apply",
            "NPM_CI_FAILURE",
            "--fix",
            "regenerate-lockfile",
            "--root",
        ])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Run this in your terminal:"))
        .stdout(predicate::str::contains("npm install --package-lock-only"));
}

#[test]
fn unknown_fix_id_fails_with_a_clear_error() {
    let home = TempDir::new().unwrap();

    doctor(&home)
        .args(["fixes", "apply", "NODE_VERSION_MISMATCH", "--fix", "no-such-fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No fix 'no-such-fix'"));
}
