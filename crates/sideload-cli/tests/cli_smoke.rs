//! Binary-level smoke tests: flag parsing and the `plan` command, which
//! needs neither a container runtime nor linker diagnostics when `--static`
//! is set.

use std::fs;
use std::process::Command;

fn sideload() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sideload"))
}

#[test]
fn help_prints_usage() {
    let output = sideload().arg("--help").output().expect("failed to run sideload");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn version_succeeds() {
    let output = sideload().arg("--version").output().expect("failed to run sideload");
    assert!(output.status.success());
}

#[test]
fn plan_static_json_reports_single_file_layout() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let exe = tmp.path().join("myprog");
    fs::write(&exe, b"\x7fELF").expect("failed to write test executable");

    let output = sideload()
        .args(["plan", "--static", "--json"])
        .arg(&exe)
        .output()
        .expect("failed to run sideload");
    assert!(
        output.status.success(),
        "plan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("plan --json emitted invalid JSON");
    assert_eq!(report["staging"]["mode"], "single_file");
    assert_eq!(report["objects"].as_array().map(Vec::len), Some(1));

    let fingerprint = report["fingerprint"].as_str().unwrap();
    assert!(fingerprint.starts_with("sideload-"));

    let remote = report["staging"]["remote_executable"].as_str().unwrap();
    assert_eq!(remote, format!("/tmp/{fingerprint}_myprog"));
}

#[test]
fn unknown_executable_fails_before_any_staging() {
    let output = sideload()
        .args(["plan", "definitely-not-a-real-program-name"])
        .output()
        .expect("failed to run sideload");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found on PATH"));
}
