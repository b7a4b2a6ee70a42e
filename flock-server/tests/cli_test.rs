#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::str::contains;

fn flock_cmd() -> Command {
    let mut cmd = Command::cargo_bin("flock").unwrap();
    cmd.env_remove("FLOCK_PORT")
        .env_remove("FLOCK_BIND_ADDR")
        .env_remove("FLOCK_NODE_ID")
        .env_remove("FLOCK_PEERS")
        .env_remove("FLOCK_DATA_DIR");
    cmd
}

#[test]
fn help_lists_cluster_flags() {
    flock_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--port"))
        .stdout(contains("--bind-addr"))
        .stdout(contains("--peers"))
        .stdout(contains("--data-dir"));
}

#[test]
fn rejects_non_numeric_port() {
    flock_cmd()
        .args(["--port", "not-a-port"])
        .assert()
        .failure();
}

#[test]
fn rejects_unknown_flag() {
    flock_cmd().arg("--definitely-not-a-flag").assert().failure();
}
