// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stagecoach_core::config::{EvaluationConfig, ProcessingConfig, RegistrationConfig, ScannerConfig, UsersConfig};
use tempfile::TempDir;

fn base_config(tmp: &TempDir) -> StagecoachConfig {
    StagecoachConfig {
        users: UsersConfig::default(),
        scanner: ScannerConfig { directory: tmp.path().join("datasets"), interval_ms: 50 },
        registration: RegistrationConfig {
            threads: 1,
            working_dir: tmp.path().join("registration"),
            target_dir: tmp.path().join("processing"),
            metadata_file_name: "metadata.tsv".to_string(),
            queue_capacity: 8,
        },
        processing: ProcessingConfig {
            threads: 1,
            working_dir: tmp.path().join("processing"),
            target_dir: tmp.path().join("evaluation"),
        },
        evaluation: EvaluationConfig {
            threads: 1,
            working_dir: tmp.path().join("evaluation"),
            target_dirs: vec![tmp.path().join("inbox")],
            measurement_id_pattern: r"^QABCD.+$".to_string(),
        },
    }
}

#[test]
fn missing_scanner_directory_fails_startup_without_blocking() {
    let tmp = TempDir::new().unwrap();
    let config = base_config(&tmp);
    // scanner.directory is never created: Scanner::new must reject it before
    // any worker thread (or the signal watcher) is spawned.
    let result = run(&config);
    assert!(result.is_err());
}

#[test]
fn invalid_measurement_pattern_is_rejected_even_if_config_validation_was_bypassed() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("datasets")).unwrap();
    let mut config = base_config(&tmp);
    config.evaluation.measurement_id_pattern = "(unterminated".to_string();

    let result = run(&config);
    assert!(result.is_err());
}
