use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_lookup_builtin_table() {
    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("lookup").arg("371449");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"brand\": \"AMEX\""))
        .stdout(predicate::str::contains("American Express"));
}

#[test]
fn test_lookup_unknown_prefix_uses_heuristic() {
    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("lookup").arg("400000");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"brand\": \"VISA\""))
        .stdout(predicate::str::contains("\"bank\": \"Unknown\""));
}

#[test]
fn test_lookup_with_table_file() {
    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("lookup")
        .arg("424242")
        .arg("--table")
        .arg("tests/fixtures/issuers.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fixture Bank"))
        .stdout(predicate::str::contains("\"type\": \"DEBIT\""));
}

#[test]
fn test_lookup_rejects_bad_prefix() {
    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("lookup").arg("41x111");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid bin"));
}

#[test]
fn test_classify_command() {
    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("classify").arg("429");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("RETRYABLE"));
}

#[test]
fn test_invalid_config_is_reported() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, r#"{{"lookup_timeout_ms": 60000}}"#).unwrap();

    let mut cmd = Command::new(cargo_bin!("cardpipe"));
    cmd.arg("--config").arg(config.path()).arg("classify").arg("200");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("lookup_timeout_ms"));
}
