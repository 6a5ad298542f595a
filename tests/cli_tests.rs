use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;
use tempdir::TempDir;

fn bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("faceit-h2h").unwrap();
    cmd.env("FACEIT_H2H_SETTINGS", dir.path().join("settings.json"))
        .env_remove("FACEIT_API_KEY")
        .env("FACEIT_API_BASE", "http://127.0.0.1:9")
        .timeout(Duration::from_secs(10));
    cmd
}

#[test]
fn menu_exits_when_stdin_is_closed() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    let assert = bin(&dir)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice").not());
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.matches("FACEIT head-to-head").count(), 1);
}

#[test]
fn menu_quits_on_q() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    bin(&dir).write_stdin("x\nq\n").assert().success().stdout(predicate::str::contains("Invalid choice"));
}

#[test]
fn stats_without_key_fails_with_message() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    bin(&dir)
        .args(["stats", "https://www.faceit.com/en/cs2/room/1-abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key is not set"));
}
