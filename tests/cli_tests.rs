//! Integration tests for the Bindery CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Binary under test, isolated from any local config or overrides
fn bindery_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bindery").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BINDERY_DEBOUNCE_MS")
        .env_remove("BINDERY_MAX_DEPTH")
        .env_remove("BINDERY_MAX_SUGGESTIONS")
        .env_remove("RUST_LOG");
    cmd
}

fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sample.json");
    fs::write(
        &path,
        r#"{
            "customer": {"name": "John", "email": "j@x.com", "tags": ["vip", "new"]},
            "items": [{"price": 9.5}, {"price": 12.0}],
            "total": 21.5
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    bindery_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("binding resolver"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("edit"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_with_data() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["resolve", "Hi {{customer.name}}, total {{ total }}", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::eq("Hi John, total 21.5\n"));
}

#[test]
fn test_resolve_array_index_and_integral_float() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["resolve", "{{items.1.price}} {{customer.tags.0}}", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::eq("12 vip\n"));
}

#[test]
fn test_resolve_unknown_path_is_empty() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["resolve", "Hi {{customer.phone}}!", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::eq("Hi !\n"));
}

#[test]
fn test_resolve_without_data_passes_through() {
    let dir = TempDir::new().unwrap();
    bindery_cmd(&dir)
        .args(["resolve", "Hi {{customer.name}}"])
        .assert()
        .success()
        .stdout(predicate::eq("Hi {{customer.name}}\n"));
}

#[test]
fn test_resolve_unclosed_token_is_literal() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["resolve", "Hi {{customer.name", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::eq("Hi {{customer.name\n"));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_yaml_props() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    let props = dir.path().join("props.yaml");
    fs::write(
        &props,
        "title: \"Order for {{customer.name}}\"\nsize: 12\nrows:\n  - \"{{customer.email}}\"\n",
    )
    .unwrap();

    bindery_cmd(&dir)
        .arg("render")
        .arg(&props)
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "Order for John""#))
        .stdout(predicate::str::contains(r#""size": 12"#))
        .stdout(predicate::str::contains(r#""j@x.com""#));
}

#[test]
fn test_render_without_data_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let props = dir.path().join("props.json");
    fs::write(&props, r#"{"title": "{{customer.name}}"}"#).unwrap();

    bindery_cmd(&dir)
        .arg("render")
        .arg(&props)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "{{customer.name}}""#));
}

// ============================================================================
// suggest / tree
// ============================================================================

#[test]
fn test_suggest_by_last_segment() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["suggest", "na", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("customer.name"))
        .stdout(predicate::str::contains("John"));
}

#[test]
fn test_suggest_respects_env_limit() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .env("BINDERY_MAX_SUGGESTIONS", "1")
        .args(["suggest", "", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.lines().count() == 1));
}

#[test]
fn test_tree_lists_top_level() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["tree", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("customer"))
        .stdout(predicate::str::contains("total"))
        .stdout(predicate::str::contains("customer.name").not());
}

#[test]
fn test_tree_below_bracket_path() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["tree", "--path", "items[0]", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("items.0.price"));
}

#[test]
fn test_tree_all() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["tree", "--all", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("customer.tags.1"))
        .stdout(predicate::str::contains("items.1.price"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_tree_invalid_path() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["tree", "--path", "customer..name", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-020"));
}

#[test]
fn test_tree_unknown_path() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    bindery_cmd(&dir)
        .args(["tree", "--path", "customer.phone", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-021"));
}

#[test]
fn test_missing_data_file() {
    let dir = TempDir::new().unwrap();
    bindery_cmd(&dir)
        .args(["resolve", "x", "--data", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-010"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_unsupported_data_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.toml");
    fs::write(&path, "a = 1").unwrap();
    bindery_cmd(&dir)
        .args(["resolve", "x", "--data"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-012"));
}

#[test]
fn test_malformed_data_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{not json").unwrap();
    bindery_cmd(&dir)
        .args(["resolve", "x", "--data"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-011"));
}

#[test]
fn test_malformed_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bindery.yaml"), "max_depth: [oops").unwrap();
    bindery_cmd(&dir)
        .args(["resolve", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIND-030"));
}

#[test]
fn test_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let data = write_sample(&dir);
    let config = dir.path().join("custom.yaml");
    fs::write(&config, "max_suggestions: 1\n").unwrap();
    bindery_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .args(["suggest", "", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.lines().count() == 1));
}
