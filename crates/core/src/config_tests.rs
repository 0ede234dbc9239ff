// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

const VALID_TOML: &str = r#"
[scanner]
directory = "/srv/stagecoach/incoming"
interval_ms = 1000

[registration]
working_dir = "/srv/stagecoach/registration"
target_dir = "/srv/stagecoach/processing"

[processing]
working_dir = "/srv/stagecoach/processing"
target_dir = "/srv/stagecoach/evaluation"

[evaluation]
working_dir = "/srv/stagecoach/evaluation"
target_dirs = ["/srv/etl/inbox-a", "/srv/etl/inbox-b"]
measurement_id_pattern = "^QBIC[0-9A-Z]{9}[0-9A-Z]{2}$"
"#;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stagecoach.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn loads_valid_config_with_defaults() {
    let (_dir, path) = write_config(VALID_TOML);
    let config = StagecoachConfig::load(&path).unwrap();
    assert_eq!(config.scanner.interval_ms, 1000);
    assert_eq!(config.registration.threads, 2);
    assert_eq!(config.users.error_directory_name, "error");
    assert_eq!(config.users.registration_directory_name, "registration");
    assert_eq!(config.registration.metadata_file_name, "metadata.tsv");
    assert_eq!(config.evaluation.target_dirs.len(), 2);
}

#[test]
fn rejects_zero_interval() {
    let toml = VALID_TOML.replace("interval_ms = 1000", "interval_ms = 0");
    let (_dir, path) = write_config(&toml);
    let err = StagecoachConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveInterval(0)));
}

#[test]
fn rejects_empty_evaluation_targets() {
    let toml = VALID_TOML.replace(
        r#"target_dirs = ["/srv/etl/inbox-a", "/srv/etl/inbox-b"]"#,
        "target_dirs = []",
    );
    let (_dir, path) = write_config(&toml);
    let err = StagecoachConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NoEvaluationTargets));
}

#[test]
fn rejects_invalid_regex_pattern() {
    let toml = VALID_TOML.replace(
        r#"measurement_id_pattern = "^QBIC[0-9A-Z]{9}[0-9A-Z]{2}$""#,
        r#"measurement_id_pattern = "(unterminated""#,
    );
    let (_dir, path) = write_config(&toml);
    let err = StagecoachConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidMeasurementIdPattern(_)));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let err = StagecoachConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read(_, _)));
}

#[test]
fn malformed_toml_is_reported() {
    let (_dir, path) = write_config("this is not [ valid toml");
    let err = StagecoachConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_, _)));
}
