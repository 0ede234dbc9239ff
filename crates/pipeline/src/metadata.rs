// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing and validation of a registration dataset's tab-separated
//! metadata side-file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata not found (expected a file ending in \"{0}\")")]
    NotFound(String),
    #[error("incomplete metadata: line has no tab-separated label: {0:?}")]
    Malformed(String),
    #[error("unknown file reference: {0}")]
    UnknownFileReference(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Find the direct child of `target_path` whose name ends with `suffix`.
pub fn find_metadata_file(target_path: &Path, suffix: &str) -> io::Result<Option<PathBuf>> {
    for entry in fs::read_dir(target_path)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// A line prefixed this way carries an operator-supplied measurement id
/// instead of a file reference, letting `measurementId` arrive already
/// populated by the time a task reaches evaluation.
const MEASUREMENT_ID_LABEL: &str = "#measurement-id";

/// Result of parsing a dataset's metadata side-file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    /// `fileRef` entries in file order, each confirmed to exist under the
    /// dataset directory.
    pub dataset_files: Vec<String>,
    /// Present only if the side-file carried a `#measurement-id` line.
    pub measurement_id: Option<String>,
}

/// Locate, parse, and validate the metadata side-file under `target_path`.
pub fn parse_and_validate(target_path: &Path, suffix: &str) -> Result<ParsedMetadata, MetadataError> {
    let metadata_path =
        find_metadata_file(target_path, suffix)?.ok_or_else(|| MetadataError::NotFound(suffix.to_string()))?;
    let content = fs::read_to_string(&metadata_path)?;

    let mut parsed = ParsedMetadata::default();
    for raw_line in content.lines() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, '\t');
        let label = parts.next().unwrap_or("");
        let Some(value) = parts.next() else {
            return Err(MetadataError::Malformed(line.to_string()));
        };

        if label == MEASUREMENT_ID_LABEL {
            parsed.measurement_id = Some(value.trim().to_string());
            continue;
        }

        if !target_path.join(label).exists() {
            return Err(MetadataError::UnknownFileReference(label.to_string()));
        }
        parsed.dataset_files.push(label.to_string());
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
