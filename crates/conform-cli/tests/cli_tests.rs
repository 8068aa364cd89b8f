use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: Value) {
    fs::write(dir.join(name), value.to_string()).unwrap();
}

/// A `conform` invocation isolated from any ambient config.
fn conform(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("conform").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("CONFORM_CONFIG")
        .env_remove("CONFORM_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "constraints.json",
        json!({
            "name": { "presence": true },
            "age": { "numericality": { "greaterThanOrEqualTo": 18 } }
        }),
    );
    write_json(dir.path(), "valid.json", json!({ "name": "Ann", "age": 30 }));
    write_json(dir.path(), "invalid.json", json!({ "name": "", "age": 12 }));
    dir
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_valid_attributes_exit_zero() {
    let dir = workspace();
    let assert = conform(&dir)
        .args(["check", "-a", "valid.json", "-c", "constraints.json"])
        .assert()
        .success();
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn test_invalid_attributes_print_report() {
    let dir = workspace();
    let assert = conform(&dir)
        .args(["check", "-a", "invalid.json", "-c", "constraints.json"])
        .assert()
        .code(1);
    assert_eq!(
        stdout_json(assert.get_output()),
        json!({
            "name": ["Name can't be blank"],
            "age": ["Age must be greater than or equal to 18"]
        })
    );
}

#[test]
fn test_format_and_short_messages() {
    let dir = workspace();
    let assert = conform(&dir)
        .args([
            "check",
            "-a",
            "invalid.json",
            "-c",
            "constraints.json",
            "--format",
            "flat",
            "--no-full-messages",
        ])
        .assert()
        .code(1);
    assert_eq!(
        stdout_json(assert.get_output()),
        json!(["can't be blank", "must be greater than or equal to 18"])
    );
}

#[test]
fn test_async_path_matches_sync() {
    let dir = workspace();
    let assert = conform(&dir)
        .args([
            "check",
            "-a",
            "invalid.json",
            "-c",
            "constraints.json",
            "--async",
            "--format",
            "constraint",
        ])
        .assert()
        .code(1);
    assert_eq!(
        stdout_json(assert.get_output()),
        json!({ "name": ["presence"], "age": ["numericality"] })
    );
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = workspace();
    fs::write(dir.path().join("conform.toml"), "format = \"flat\"\n").unwrap();

    let assert = conform(&dir)
        .args(["check", "-a", "invalid.json", "-c", "constraints.json"])
        .assert()
        .code(1);
    assert_eq!(
        stdout_json(assert.get_output()),
        json!(["Name can't be blank", "Age must be greater than or equal to 18"])
    );

    // Flags win over the file
    let assert = conform(&dir)
        .args([
            "check",
            "-a",
            "invalid.json",
            "-c",
            "constraints.json",
            "--format",
            "constraint",
        ])
        .assert()
        .code(1);
    assert_eq!(
        stdout_json(assert.get_output()),
        json!({ "name": ["presence"], "age": ["numericality"] })
    );
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = workspace();
    conform(&dir)
        .args([
            "--config",
            "missing.toml",
            "check",
            "-a",
            "valid.json",
            "-c",
            "constraints.json",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_validator_is_a_fault() {
    let dir = workspace();
    write_json(dir.path(), "bad.json", json!({ "name": { "uniqueness": true } }));
    let assert = conform(&dir)
        .args(["check", "-a", "valid.json", "-c", "bad.json"])
        .assert()
        .code(2);
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn test_attributes_must_be_an_object() {
    let dir = workspace();
    write_json(dir.path(), "list.json", json!([1, 2, 3]));
    conform(&dir)
        .args(["check", "-a", "list.json", "-c", "constraints.json"])
        .assert()
        .code(2);
}

#[test]
fn test_list_validators_as_json() {
    let dir = workspace();
    let assert = conform(&dir).args(["validators", "--json"]).assert().success();
    let names = stdout_json(assert.get_output());
    let names: Vec<&str> = names
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    for builtin in ["date", "datetime", "email", "equality", "exclusion", "format", "inclusion", "length", "numericality", "presence", "url"] {
        assert!(names.contains(&builtin), "missing {builtin}");
    }
}
