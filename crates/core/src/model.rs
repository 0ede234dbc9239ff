// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value types shared by the scanner and every pipeline stage.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A dataset the scanner found sitting in a user's drop folder.
///
/// Equality (and therefore the scanner's dedup key) is `targetPath` and
/// `lastModified` only — `detectedAt` is informational and deliberately
/// excluded so the same physical entry detected on two different ticks
/// still compares equal as long as its mtime hasn't changed.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Wall-clock time the scanner observed this entry (epoch ms).
    pub detected_at: u64,
    /// Filesystem mtime of the entry (epoch ms).
    pub last_modified: u64,
    /// The user's home-like directory, e.g. `/srv/users/alice`.
    pub user_path: PathBuf,
    /// The user's drop folder, e.g. `/srv/users/alice/registration`.
    pub origin_path: PathBuf,
    /// The dataset entry itself, inside `origin_path`.
    pub target_path: PathBuf,
}

impl PartialEq for RegistrationRequest {
    fn eq(&self, other: &Self) -> bool {
        self.target_path == other.target_path && self.last_modified == other.last_modified
    }
}

impl Eq for RegistrationRequest {}

impl std::hash::Hash for RegistrationRequest {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.target_path.hash(state);
        self.last_modified.hash(state);
    }
}

/// The persisted metadata record traveling with a task directory.
///
/// Field names match the stable, downstream-visible JSON schema exactly.
/// Unknown fields on read are ignored by virtue of not being declared here
/// (serde's default behavior for structs without `deny_unknown_fields`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub origin: PathBuf,
    pub user: PathBuf,
    #[serde(rename = "measurementId", default)]
    pub measurement_id: Option<String>,
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    #[serde(rename = "datasetFiles", default)]
    pub dataset_files: Vec<String>,
    #[serde(default)]
    pub history: Vec<PathBuf>,
}

impl Provenance {
    pub fn new(origin: PathBuf, user: PathBuf, task_id: TaskId, dataset_files: Vec<String>) -> Self {
        Self { origin, user, measurement_id: None, task_id, dataset_files, history: Vec::new() }
    }

    /// Append a stage's working directory to the history. Append-only: never
    /// call this with a path already the last entry, and never rebuild the
    /// vector from scratch — callers must read-modify-write the existing file.
    pub fn record_stage(&mut self, working_dir: &Path) {
        self.history.push(working_dir.to_path_buf());
    }

    /// True when no measurement id has been supplied, or it is blank.
    pub fn measurement_id_missing(&self) -> bool {
        match &self.measurement_id {
            None => true,
            Some(s) => s.trim().is_empty(),
        }
    }
}

/// The canonical filename for a task directory's metadata record.
pub const PROVENANCE_FILE_NAME: &str = "provenance.json";

/// The canonical filename for a parked task's human-readable error note.
pub const ERROR_FILE_NAME: &str = "error.txt";

/// Read and deserialize `provenance.json` from a task directory.
pub fn read_provenance(task_dir: &Path) -> std::io::Result<Provenance> {
    let raw = std::fs::read_to_string(task_dir.join(PROVENANCE_FILE_NAME))?;
    serde_json::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Serialize and write `provenance.json` into a task directory, replacing
/// any prior contents. Used both at creation and after every
/// `record_stage` call.
pub fn write_provenance(task_dir: &Path, provenance: &Provenance) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(provenance)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(task_dir.join(PROVENANCE_FILE_NAME), json)
}

/// Write a human-readable error note into a task directory that is about to
/// be parked (either to a user's error folder or a stage's intervention
/// directory).
pub fn write_error_note(task_dir: &Path, reason: &str) -> std::io::Result<()> {
    std::fs::write(task_dir.join(ERROR_FILE_NAME), reason)
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
