use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_ingest_subcommand() {
    let mut cmd = Command::cargo_bin("recording-ingestor").expect("Binary exists");

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingest"));
}

#[test]
fn ingest_fails_cleanly_when_the_config_file_is_missing() {
    let mut cmd = Command::cargo_bin("recording-ingestor").expect("Binary exists");

    cmd.arg("ingest")
        .arg("--config")
        .arg("/nonexistent/ingestor.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}
