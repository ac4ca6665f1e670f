//! CLI end-to-end tests.
//!
//! These tests spawn the actual `pycomments` binary and validate stdout and
//! exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments (bad flag value, unparse unavailable for target)
//! - 3: Source error (missing file, syntax error)
//! - 5: Round-trip verification failed

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run pycomments with given arguments and return (stdout, stderr, exit_code).
fn run_pycomments(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pycomments"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute pycomments");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, content).expect("write file");
    path
}

fn json(stdout: &str) -> Value {
    serde_json::from_str(stdout).expect("stdout should be valid JSON")
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn parse_prints_enriched_tree() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "x = 1  # one\n");

    let (stdout, _stderr, exit_code) = run_pycomments(&["parse", file.to_str().unwrap()]);
    assert_eq!(exit_code, 0);

    let json = json(&stdout);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mode"], "positional");
    assert_eq!(json["comment_count"], 1);
    let body = json["tree"]["body"].as_array().expect("body array");
    assert_eq!(body.len(), 2);
    assert_eq!(body[1]["kind"]["Comment"]["value"], "# one");
    assert_eq!(body[1]["kind"]["Comment"]["inline"], true);
}

#[test]
fn parse_attached_mode() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "# lead\nx = 1  # one\n");

    let (stdout, _stderr, exit_code) =
        run_pycomments(&["parse", file.to_str().unwrap(), "--mode", "attached"]);
    assert_eq!(exit_code, 0);

    let json = json(&stdout);
    assert_eq!(json["mode"], "attached");
    assert_eq!(json["comment_count"], 2);
    let body = json["tree"]["body"].as_array().expect("body array");
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["comments"], serde_json::json!(["lead", "one"]));
}

#[test]
fn parse_syntax_error_returns_exit_3() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bad.py", "x = 1\ndef f(:\n    pass\n");

    let (stdout, stderr, exit_code) = run_pycomments(&["parse", file.to_str().unwrap()]);
    assert_eq!(exit_code, 3, "stdout: {}", stdout);

    let json = json(&stdout);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
    assert!(stderr.contains("bad.py"), "stderr: {}", stderr);
}

#[test]
fn parse_missing_file_returns_exit_3() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.py");

    let (stdout, _stderr, exit_code) = run_pycomments(&["parse", missing.to_str().unwrap()]);
    assert_eq!(exit_code, 3);
    assert_eq!(json(&stdout)["status"], "error");
}

// ============================================================================
// unparse
// ============================================================================

#[test]
fn unparse_prints_source_with_comments() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "# lead\nx = 1    # one\n");

    let (stdout, _stderr, exit_code) = run_pycomments(&["unparse", file.to_str().unwrap()]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "# lead\nx = 1  # one\n");
}

#[test]
fn unparse_strip_drops_comments() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "# lead\nx = 1    # one\n");

    let (stdout, _stderr, exit_code) =
        run_pycomments(&["unparse", file.to_str().unwrap(), "--strip"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "x = 1\n");
}

#[test]
fn unparse_json_envelope() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "x = 1  # one\n");

    let (stdout, _stderr, exit_code) =
        run_pycomments(&["unparse", file.to_str().unwrap(), "--json"]);
    assert_eq!(exit_code, 0);
    let json = json(&stdout);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["source"], "x = 1  # one");
}

#[test]
fn unparse_for_old_target_returns_exit_2() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.py", "x = 1\n");

    let (stdout, _stderr, exit_code) =
        run_pycomments(&["unparse", "--target", "3.8", file.to_str().unwrap()]);
    assert_eq!(exit_code, 2);
    let json = json(&stdout);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
}

#[test]
fn invalid_target_is_rejected() {
    let (_stdout, _stderr, exit_code) = run_pycomments(&["parse", "a.py", "--target", "2.7"]);
    assert_eq!(exit_code, 2);
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_directory_passes() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "pkg/a.py", "# a\nx = 1  # x\n");
    write_file(
        dir.path(),
        "pkg/b.py",
        "class B:  # b\n    def f(self):\n        pass  # p\n",
    );
    write_file(dir.path(), "pkg/__pycache__/c.py", "not python at all (\n");

    let (stdout, _stderr, exit_code) = run_pycomments(&["check", dir.path().to_str().unwrap()]);
    assert_eq!(exit_code, 0, "stdout: {}", stdout);

    let json = json(&stdout);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["passed"], 2);
    assert_eq!(json["failed"], 0);
}

#[test]
fn check_reports_unparsable_files_and_returns_exit_5() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "good.py", "x = 1\n");
    write_file(dir.path(), "bad.py", "def f(:\n");

    let (stdout, _stderr, exit_code) = run_pycomments(&["check", dir.path().to_str().unwrap()]);
    assert_eq!(exit_code, 5);

    let json = json(&stdout);
    assert_eq!(json["status"], "failed");
    assert_eq!(json["passed"], 1);
    assert_eq!(json["failed"], 1);
    let results = json["results"].as_array().expect("results array");
    assert!(results[0]["file"].as_str().unwrap().ends_with("bad.py"));
    assert_eq!(results[0]["status"], "error");
}
