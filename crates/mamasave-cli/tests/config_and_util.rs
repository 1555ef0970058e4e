//! Integration tests for server config loading and file helpers.

use std::collections::HashMap;
use std::io::Write;

use mamasave_cli::config::{ServeConfig, ARTIFACT_ENV, PORT_ENV};
use mamasave_cli::util::{delimiter_for, validate_tsv_or_csv_file};

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("serve_config.json");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file / delimiter_for
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

#[test]
fn delimiter_follows_extension() {
    assert_eq!(delimiter_for("a.tsv"), b'\t');
    assert_eq!(delimiter_for("a.TSV"), b'\t');
    assert_eq!(delimiter_for("a.csv"), b',');
    assert_eq!(delimiter_for("a"), b',');
}

// ---------------------------------------------------------------------------
// ServeConfig
// ---------------------------------------------------------------------------

#[test]
fn serve_config_default_values() {
    let cfg = ServeConfig::default();
    assert_eq!(cfg.artifact_path, "risk_model.json");
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8000);
    assert!(cfg.cors);
    assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
}

#[test]
fn serve_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{"artifact_path": "/models/risk.json", "host": "127.0.0.1", "port": 9000, "cors": false}"#,
    );
    let cfg = ServeConfig::from_file(&path).unwrap();
    assert_eq!(cfg.artifact_path, "/models/risk.json");
    assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
    assert!(!cfg.cors);
}

#[test]
fn serve_config_keeps_defaults_for_missing_and_invalid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{"port": "eighty", "cors": false}"#);
    let cfg = ServeConfig::from_file(&path).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.artifact_path, "risk_model.json");
    assert!(!cfg.cors);
}

#[test]
fn serve_config_rejects_unparseable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "not json");
    assert!(ServeConfig::from_file(&path).is_err());
}

#[test]
fn environment_overrides_file_values() {
    let env: HashMap<&str, &str> = [(ARTIFACT_ENV, "/env/model.json"), (PORT_ENV, " 5000 ")]
        .into_iter()
        .collect();
    let mut cfg = ServeConfig::default();
    cfg.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(cfg.artifact_path, "/env/model.json");
    assert_eq!(cfg.port, 5000);
}

#[test]
fn invalid_port_in_environment_errors() {
    let mut cfg = ServeConfig::default();
    let result = cfg.apply_env(|k| (k == PORT_ENV).then(|| "99999".to_string()));
    assert!(result.is_err());
}
