//! End-to-end tests of the `ossim` binary.
//!
//! Runs the built executable against request files and checks exit status
//! and output files.

use std::{fs, process::Command};

fn ossim() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ossim"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn writes_response_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("request.json");
    let output = dir.path().join("response.json");
    fs::write(&input, r#"{"mode":"DEADLOCK","deadlock":{"edges":[{"from":"A","to":"A"}]}}"#)
        .unwrap();

    let status = ossim().arg(&input).arg("--compact").arg("-o").arg(&output).status().unwrap();

    assert!(status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), r#"{"deadlock":true,"cycle":["A","A"]}"#);
}

#[test]
fn invalid_request_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("request.json");
    let output = dir.path().join("response.json");
    fs::write(&input, r#"{"mode":"MEMORY","memory":{"frames":0,"algorithm":"FIFO"}}"#).unwrap();

    let result = ossim().arg(&input).arg("-o").arg(&output).output().unwrap();

    assert!(!result.status.success());
    assert!(!output.exists());
    assert!(String::from_utf8_lossy(&result.stderr).contains("frame count must be at least 1"));
}

#[test]
fn unknown_mode_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("request.json");
    fs::write(&input, r#"{"mode":"PAGING"}"#).unwrap();

    let result = ossim().arg(&input).output().unwrap();

    assert!(!result.status.success());
    assert!(result.stdout.is_empty());
}
