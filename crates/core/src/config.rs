// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration schema and loader.
//!
//! One nested table per dotted config prefix from the interface contract:
//! `users.*`, `scanner.*`, `registration.*`, `processing.*`, `evaluation.*`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("scanner.interval_ms must be greater than 0, got {0}")]
    NonPositiveInterval(u64),

    #[error("evaluation.target_dirs must name at least one inbox")]
    NoEvaluationTargets,

    #[error("invalid evaluation.measurement_id_pattern: {0}")]
    InvalidMeasurementIdPattern(#[source] regex::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    #[serde(default = "default_error_dir_name")]
    pub error_directory_name: String,
    #[serde(default = "default_registration_dir_name")]
    pub registration_directory_name: String,
}

fn default_error_dir_name() -> String {
    "error".to_string()
}

fn default_registration_dir_name() -> String {
    "registration".to_string()
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            error_directory_name: default_error_dir_name(),
            registration_directory_name: default_registration_dir_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    pub directory: PathBuf,
    #[serde(default = "default_scanner_interval_ms")]
    pub interval_ms: u64,
}

fn default_scanner_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_threads")]
    pub threads: usize,
    pub working_dir: PathBuf,
    pub target_dir: PathBuf,
    #[serde(default = "default_metadata_file_name")]
    pub metadata_file_name: String,
    /// Bound on the in-memory registration queue before `enqueue` blocks.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_metadata_file_name() -> String {
    "metadata.tsv".to_string()
}

fn default_queue_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_threads")]
    pub threads: usize,
    pub working_dir: PathBuf,
    pub target_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_threads")]
    pub threads: usize,
    pub working_dir: PathBuf,
    pub target_dirs: Vec<PathBuf>,
    pub measurement_id_pattern: String,
}

fn default_threads() -> usize {
    2
}

/// Top-level configuration, as loaded from `stagecoach.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StagecoachConfig {
    #[serde(default)]
    pub users: UsersConfig,
    pub scanner: ScannerConfig,
    pub registration: RegistrationConfig,
    pub processing: ProcessingConfig,
    pub evaluation: EvaluationConfig,
}

impl StagecoachConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// Fails fast: a missing file, unparseable TOML, a non-positive scan
    /// interval, an empty evaluation target list, or an invalid measurement
    /// id pattern all abort startup rather than limping along with a
    /// half-usable config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.interval_ms == 0 {
            return Err(ConfigError::NonPositiveInterval(self.scanner.interval_ms));
        }
        if self.evaluation.target_dirs.is_empty() {
            return Err(ConfigError::NoEvaluationTargets);
        }
        regex::Regex::new(&self.evaluation.measurement_id_pattern)
            .map_err(ConfigError::InvalidMeasurementIdPattern)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
