//! Smoke tests for the binary. Nothing here talks to a model server.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cliagent(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cliagent");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("STATE_DIR", dir.path().join("state"))
        .env("OLLAMA_HOST", "http://127.0.0.1:9")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cliagent(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn create_records_file_in_session() {
    let dir = TempDir::new().unwrap();

    cliagent(&dir)
        .args(["create", "hello.py", "print('hi')"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File created: hello.py"));

    assert_eq!(
        fs::read_to_string(dir.path().join("hello.py")).unwrap(),
        "print('hi')"
    );
    let session = fs::read_to_string(dir.path().join("state/current_session.json")).unwrap();
    assert!(session.contains("hello.py"));
}

#[test]
fn create_without_overwrite_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keep.txt"), "original").unwrap();

    cliagent(&dir)
        .args(["create", "keep.txt", "replacement"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(dir.path().join("keep.txt")).unwrap(),
        "original"
    );

    cliagent(&dir)
        .args(["create", "keep.txt", "replacement", "--overwrite"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("keep.txt")).unwrap(),
        "replacement"
    );
}

#[test]
fn list_and_read_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("proj/src")).unwrap();
    fs::write(dir.path().join("proj/src/main.py"), "print(1)").unwrap();
    fs::write(dir.path().join("proj/README.md"), "# proj").unwrap();

    cliagent(&dir)
        .args(["list", "proj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md\nsrc/main.py"));

    cliagent(&dir)
        .args(["read", "proj/README.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# proj"));
}

#[test]
fn task_fails_cleanly_without_backend() {
    let dir = TempDir::new().unwrap();

    cliagent(&dir)
        .args(["task", "build", "a", "calculator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ollama is not running"));

    assert!(!dir.path().join("state/current_session.json").exists());
}

#[test]
fn reset_archives_session() {
    let dir = TempDir::new().unwrap();
    cliagent(&dir)
        .args(["create", "a.py", "x = 1"])
        .assert()
        .success();

    cliagent(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session archived"));

    let state = dir.path().join("state");
    assert!(!state.join("current_session.json").exists());
    let archives = fs::read_dir(&state)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("session_"))
        .count();
    assert_eq!(archives, 1);
}
