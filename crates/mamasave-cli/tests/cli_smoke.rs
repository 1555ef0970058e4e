//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `mamasave` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../mamasave-classifiers/tests/data/risk_model.json"
);

fn cmd() -> Command {
    Command::cargo_bin("mamasave").unwrap()
}

fn write_readings(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mamasave"));
}

// ---------------------------------------------------------------------------
// Inspect subcommand
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_model_summary() {
    cmd()
        .args(["inspect", "--artifact", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"softmax_regression\""))
        .stdout(predicate::str::contains("\"mid risk\""))
        .stdout(predicate::str::contains("\"ContractionIntensity\""));
}

#[test]
fn inspect_requires_artifact() {
    cmd().arg("inspect").assert().failure();
}

#[test]
fn inspect_nonexistent_artifact_errors() {
    cmd()
        .args(["inspect", "--artifact", "/nonexistent/risk_model.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read artifact"));
}

// ---------------------------------------------------------------------------
// Predict subcommand
// ---------------------------------------------------------------------------

#[test]
fn predict_writes_csv_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_readings(
        &dir,
        "readings.csv",
        "HeartRate,BodyTemp,BloodOxygen,ContractionFreq,ContractionIntensity\n\
         80,37.0,98,2,5\n\
         130,39.0,90,6,9\n",
    );

    cmd()
        .args(["predict", "--artifact", FIXTURE])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("predicted_risk,p_high risk,p_low risk,p_mid risk"))
        .stdout(predicate::str::contains("low risk"))
        .stdout(predicate::str::contains("high risk"))
        .stderr(predicate::str::contains("Completed 2 predictions"));
}

#[test]
fn predict_writes_tsv_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_readings(
        &dir,
        "readings.tsv",
        "PatientId\tHeartRate\tBodyTemp\tBloodOxygen\tContractionFreq\tContractionIntensity\n\
         a\t80\t37.0\t98\t2\t5\n",
    );
    let output = dir.path().join("out.tsv");

    cmd()
        .args(["predict", "--artifact", FIXTURE])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().contains("\tpredicted_risk\t"));
    assert!(lines.next().unwrap().contains("\tlow risk\t"));
}

#[test]
fn predict_rejects_non_numeric_cells() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_readings(
        &dir,
        "readings.csv",
        "HeartRate,BodyTemp,BloodOxygen,ContractionFreq,ContractionIntensity\n\
         fast,37.0,98,2,5\n",
    );

    cmd()
        .args(["predict", "--artifact", FIXTURE])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn predict_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_readings(&dir, "readings.txt", "HeartRate\n80\n");

    cmd()
        .args(["predict", "--artifact", FIXTURE])
        .arg(&input)
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Serve subcommand
// ---------------------------------------------------------------------------

#[test]
fn serve_with_missing_artifact_fails_to_start() {
    cmd()
        .args(["serve", "--artifact", "/nonexistent/risk_model.json", "--port", "0"])
        .env_remove("MAMASAVE_ARTIFACT")
        .env_remove("PORT")
        .assert()
        .failure();
}

#[test]
fn serve_with_invalid_port_env_fails() {
    cmd()
        .args(["serve", "--artifact", FIXTURE])
        .env("PORT", "not-a-port")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid PORT value"));
}
