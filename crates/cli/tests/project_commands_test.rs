//! Migration analysis, config bootstrap and format resolution through the binary.

use std::fs;
use std::path::Path;

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

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn gen1_project_with_blockers_is_not_ready() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "amplify/backend/api/blog/schema.graphql",
        "type Post @model @searchable {\n  id: ID!\n}\n",
    );

    let assert = doctor(&home)
        .args(["migrate", "--path"])
        .arg(project.path())
        .assert()
        .success();
    let analysis = json_stdout(assert);

    assert_eq!(analysis["generation"], "gen1");
    assert_eq!(analysis["readyForMigration"], false);
    assert!(!analysis["blockingIssues"].as_array().unwrap().is_empty());
    assert_eq!(analysis["summary"]["totalFeatures"], 2);
    assert_eq!(analysis["summary"]["notSupported"], 1);

    let searchable = analysis["features"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["feature"].as_str().unwrap().contains("@searchable"))
        .unwrap();
    assert_eq!(searchable["compatibility"]["status"], "notSupported");
    assert!(searchable["lineNumber"].is_number());
}

#[test]
fn gen2_project_is_recognized_without_scanning() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "amplify/backend.ts", "export const backend = {};\n");

    let assert = doctor(&home)
        .args(["migrate", "-p"])
        .arg(project.path())
        .assert()
        .success();
    let analysis = json_stdout(assert);

    assert_eq!(analysis["generation"], "gen2");
    assert_eq!(analysis["readyForMigration"], true);
    assert!(analysis["features"].as_array().unwrap().is_empty());
}

#[test]
fn migrate_defaults_to_the_current_directory() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "amplify/backend.ts", "");

    let assert = doctor(&home)
        .current_dir(project.path())
        .arg("migrate")
        .assert()
        .success();
    assert_eq!(json_stdout(assert)["generation"], "gen2");
}

#[test]
fn text_format_renders_the_markdown_report() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "amplify/backend/api/blog/schema.graphql",
        "type Post @model @searchable {\n  id: ID!\n}\n",
    );

    doctor(&home)
        .args(["-f", "text", "migrate", "--path"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# Amplify Gen1 → Gen2 Migration Analysis"))
        .stdout(predicate::str::contains("## Summary"))
        .stdout(predicate::str::contains("Blocking Issues"));
}

#[test]
fn init_writes_a_sample_config_once() {
    let home = TempDir::new().unwrap();

    doctor(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file at"));
    let body = fs::read_to_string(home.path().join(".amplify-doctor.toml")).unwrap();
    assert!(body.contains("default_format"));

    // a second init refuses to clobber unless forced
    doctor(&home)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    doctor(&home).args(["init", "-F"]).assert().success();
}

#[test]
fn config_default_format_applies_when_no_flag_is_given() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join(".amplify-doctor.toml"),
        "default_format = \"text\"\n",
    )
    .unwrap();
    let log = home.path().join("clean.log");
    fs::write(&log, "Compiled successfully.\n").unwrap();

    doctor(&home)
        .arg("diagnose")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("No known failure patterns detected."));

    // an explicit flag still wins over the config file
    let assert = doctor(&home)
        .args(["-f", "json", "diagnose"])
        .arg(&log)
        .assert()
        .success();
    let report = json_stdout(assert);
    assert!(report["issues"].as_array().unwrap().is_empty());
}

#[test]
fn config_patterns_file_redirects_the_store() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("team-patterns.json");
    fs::write(
        home.path().join(".amplify-doctor.toml"),
        format!("patterns_file = \"{}\"\n", store.display()),
    )
    .unwrap();

    doctor(&home).args(["patterns", "list"]).assert().success();
    assert!(store.exists()); // the registry seeded the configured store
    assert!(!home.path().join(".amplify-doctor-patterns.json").exists());
}
