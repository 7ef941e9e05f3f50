//! End-to-end tests for the `caseflow` binary.
//!
//! Each test runs the binary inside its own temporary working directory so a
//! stray `caseflow.toml` never leaks in.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn caseflow(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_caseflow"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "error")
        .env_remove("CASEFLOW_RUNNER_STOP_ON_FAILURE")
        .env_remove("CASEFLOW_REPORT_OUTPUT_DIR")
        .output()
        .expect("binary should start")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn quoted(path: &Path) -> String {
    toml::Value::String(path.display().to_string()).to_string()
}

/// Two identical trees plus a test set comparing them.
fn passing_suite(dir: &Path) -> std::path::PathBuf {
    for side in ["src", "dst"] {
        fs::create_dir_all(dir.join(side).join("nested")).unwrap();
        fs::write(dir.join(side).join("nested/file.txt"), "same").unwrap();
    }
    let suite = dir.join("pass.toml");
    fs::write(
        &suite,
        format!(
            r#"
name = "pass"

[[cases]]
id = "1"
kind = "dir-compare"
[cases.inputs]
source = {}
destination = {}
"#,
            quoted(&dir.join("src")),
            quoted(&dir.join("dst"))
        ),
    )
    .unwrap();
    suite
}

fn failing_suite(dir: &Path) -> std::path::PathBuf {
    let suite = dir.join("fail.toml");
    fs::write(
        &suite,
        r#"
name = "fail"

[[cases]]
id = "1"
kind = "selenium"

[[cases]]
id = "2"
kind = "dir-compare"
enabled = false
"#,
    )
    .unwrap();
    suite
}

#[test]
fn list_prints_builtin_kinds_as_json() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["list", "--output", "json"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["total"], 2);
    assert_eq!(json["scenarios"][0]["kind"], "command");
    assert_eq!(json["scenarios"][1]["kind"], "dir-compare");
}

#[test]
fn run_passing_suite_exits_zero() {
    let dir = TempDir::new().unwrap();
    let suite = passing_suite(dir.path());

    let output = caseflow(
        dir.path(),
        &["run", suite.to_str().unwrap(), "--output", "json"],
    );

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["name"], "pass");
    assert_eq!(json["summary"]["passed"], 1);
    assert_eq!(json["results"][0]["status"], "PASSED");
}

#[test]
fn run_failing_suite_exits_one() {
    let dir = TempDir::new().unwrap();
    let suite = failing_suite(dir.path());

    let output = caseflow(
        dir.path(),
        &["run", suite.to_str().unwrap(), "--output", "json"],
    );

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["summary"]["skipped"], 1);
    assert!(
        json["results"][0]["result_string"]
            .as_str()
            .unwrap()
            .contains("selenium")
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 test case(s) failed"));
}

#[test]
fn run_writes_report_file() {
    let dir = TempDir::new().unwrap();
    let suite = passing_suite(dir.path());
    let reports = dir.path().join("reports");

    let output = caseflow(
        dir.path(),
        &[
            "run",
            suite.to_str().unwrap(),
            "--report-dir",
            reports.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let files: Vec<_> = fs::read_dir(&reports).unwrap().collect();
    assert_eq!(files.len(), 1);
    let name = files[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("pass-") && name.ends_with(".json"), "{name}");
}

#[test]
fn unwritable_report_dir_still_renders_results() {
    let dir = TempDir::new().unwrap();
    let suite = passing_suite(dir.path());
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let reports = blocker.join("sub");

    let output = caseflow(
        dir.path(),
        &[
            "run",
            suite.to_str().unwrap(),
            "--output",
            "json",
            "--report-dir",
            reports.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["summary"]["passed"], 1);
    assert_eq!(json["results"][0]["status"], "PASSED");
    assert!(json.get("report_path").is_none());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to write report"), "{stderr}");
}

#[test]
fn run_uses_config_from_working_directory() {
    let dir = TempDir::new().unwrap();
    let suite = failing_suite(dir.path());
    fs::write(
        dir.path().join("caseflow.toml"),
        "[report]\noutput_dir = \"out\"\n",
    )
    .unwrap();

    let output = caseflow(dir.path(), &["run", suite.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 1);
}

#[test]
fn run_missing_suite_is_command_error() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["run", "absent.toml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("test set file not found"));
}

#[test]
fn explicit_missing_config_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["--config", "nope.toml", "list"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_log_level_flag_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["list", "--log-level", "loud"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_validate_reports_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[general]\nlog_format = \"xml\"\n").unwrap();

    let output = caseflow(
        dir.path(),
        &["config", "validate", "--config", path.to_str().unwrap(), "--output", "json"],
    );

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["valid"], false);
    assert!(json["errors"][0].as_str().unwrap().contains("general.log_format"));
}

#[test]
fn config_validate_defaults_is_valid() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["config", "validate"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(defaults)"));
    assert!(stdout.contains("VALID"));
}

#[test]
fn config_show_section_and_redaction() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("caseflow.toml"),
        "[settings.sql]\nusername = \"sa\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    let output = caseflow(dir.path(), &["config", "show", "--section", "settings"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("username = \"sa\""));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn config_show_unknown_section_fails() {
    let dir = TempDir::new().unwrap();
    let output = caseflow(dir.path(), &["config", "show", "--section", "ebpf"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown section"));
}
