// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared parking helpers used by every stage: write an `error.txt`, then
//! move the whole task directory somewhere a human (or a system operator)
//! can act on it.

use stagecoach_core::{fsutil, write_error_note};
use std::io;
use std::path::Path;

fn task_dir_name(task_dir: &Path) -> io::Result<&std::ffi::OsStr> {
    task_dir
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "task directory has no name"))
}

/// Park `task_dir` into the submitting user's error directory, creating it
/// on demand, after writing `reason` as its `error.txt`.
pub fn park_to_user(user_error_dir: &Path, task_dir: &Path, reason: &str) -> io::Result<()> {
    fsutil::ensure_dir(user_error_dir)?;
    write_error_note(task_dir, reason)?;
    let dest = user_error_dir.join(task_dir_name(task_dir)?);
    fsutil::atomic_move(task_dir, &dest)
}

/// Park `task_dir` into the stage-local intervention directory, creating it
/// on demand, after writing `reason` as its `error.txt`.
pub fn park_to_intervention(interventions_dir: &Path, task_dir: &Path, reason: &str) -> io::Result<()> {
    fsutil::ensure_dir(interventions_dir)?;
    write_error_note(task_dir, reason)?;
    let dest = interventions_dir.join(task_dir_name(task_dir)?);
    fsutil::atomic_move(task_dir, &dest)
}

#[cfg(test)]
#[path = "parking_tests.rs"]
mod tests;
