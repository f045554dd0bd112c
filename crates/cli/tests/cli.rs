//! End-to-end tests for the tabstore binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn tabstore(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tabstore").unwrap();
    cmd.arg("--store").arg(store);
    // Keep the developer's own configuration out of the way
    cmd.env("TABSTORE_CONFIG", store.with_file_name("no-config.json"));
    cmd.env_remove("TABSTORE_QUOTA_BYTES");
    cmd.env_remove("TABSTORE_AUTO_CLEANUP");
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_set_get_remove_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");

    tabstore(&store)
        .args(["set", "user-settings", r#"{"theme":"dark"}"#])
        .assert()
        .success();

    tabstore(&store)
        .args(["get", "user-settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"theme":"dark"}"#));

    tabstore(&store).args(["remove", "user-settings"]).assert().success();

    tabstore(&store)
        .args(["get", "user-settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No value stored"));
}

#[test]
fn test_analyze_reports_categories() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");

    tabstore(&store).args(["set", "openai-api-key", "sk-123"]).assert().success();
    tabstore(&store).args(["set", "image-cache-1", "data"]).assert().success();

    let output = tabstore(&store).arg("analyze").output().unwrap();
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let categories: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["category"].as_str().unwrap())
        .collect();
    assert!(categories.contains(&"api-keys"));
    assert!(categories.contains(&"image-cache"));
}

#[test]
fn test_cleanup_keeps_critical_entries() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");

    tabstore(&store).args(["set", "user-settings", "{}"]).assert().success();
    tabstore(&store).args(["set", "search-cache-1", "results"]).assert().success();

    tabstore(&store)
        .args(["cleanup", "--strategy", "priority", "--target", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"freedBytes\""));

    tabstore(&store).args(["get", "user-settings"]).assert().success();
    tabstore(&store).args(["get", "search-cache-1"]).assert().failure();
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");
    let copy = temp_dir.path().join("copy.json");
    let dump = temp_dir.path().join("dump.json");

    tabstore(&store).args(["set", "vocab-deck", "hola,adios"]).assert().success();
    tabstore(&store)
        .args(["export", "--output"])
        .arg(&dump)
        .assert()
        .success();

    tabstore(&copy).arg("import").arg(&dump).assert().success();
    tabstore(&copy)
        .args(["get", "vocab-deck"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hola,adios"));
}

#[test]
fn test_import_rejects_non_objects() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");
    let dump = temp_dir.path().join("dump.json");
    std::fs::write(&dump, "[1, 2]").unwrap();

    tabstore(&store).arg("import").arg(&dump).assert().failure();
}

#[test]
fn test_quota_flag_sets_the_ceiling() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");

    tabstore(&store)
        .args(["--quota-bytes", "4096", "quota"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 4096"));
}

#[test]
fn test_invalid_strategy_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("storage.json");

    tabstore(&store)
        .args(["cleanup", "--strategy", "arc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cleanup strategy"));
}
