// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem primitives shared by the scanner and every stage.
//!
//! Every inter-stage transition is a single atomic rename; the one place
//! that cannot be a rename (copying into a downstream inbox, which may live
//! on a different filesystem) is a plain recursive copy instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the direct subdirectories of `root`, non-recursively.
///
/// Used by the scanner to enumerate user directories and by each stage to
/// enumerate task directories in its working directory.
pub fn list_subdirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            out.push(entry.path());
        }
    }
    Ok(out)
}

/// List the direct, non-hidden entries of `dir` (files or directories).
///
/// A hidden entry is one whose file name starts with `.`. Used by the
/// scanner when listing a drop folder's contents.
pub fn list_visible_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !is_hidden {
            out.push(entry.path());
        }
    }
    Ok(out)
}

/// Create `dir` (and parents) if it does not already exist.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        Ok(())
    } else {
        fs::create_dir_all(dir)
    }
}

/// Atomically move `from` to `to` via rename.
///
/// This is the pipeline's sole commit primitive: the caller is either fully
/// visible at `to` or still fully at `from`, with no observable partial
/// state. Relies on `from` and `to` sharing a filesystem, which the
/// deployment (stage working directories carved out of the same volume) is
/// expected to guarantee; a cross-device rename fails loudly (`EXDEV`)
/// rather than silently falling back to copy+delete, which would give up
/// the atomicity guarantee.
pub fn atomic_move(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Recursively copy `from` into `to`, creating `to` and any needed
/// subdirectories. Used only for the evaluation stage's copy into a
/// downstream inbox, which may be a different filesystem than the
/// evaluation working directory.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let dest = to.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir_recursive(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Returns the single non-`provenance.json`, non-`error.txt` entry in a task
/// directory, or `None` if there isn't exactly one.
pub fn find_payload(task_dir: &Path) -> io::Result<Option<PathBuf>> {
    use crate::model::{ERROR_FILE_NAME, PROVENANCE_FILE_NAME};
    let mut payload = None;
    for entry in fs::read_dir(task_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == PROVENANCE_FILE_NAME || name == ERROR_FILE_NAME {
            continue;
        }
        if payload.is_some() {
            return Ok(None);
        }
        payload = Some(entry.path());
    }
    Ok(payload)
}

#[cfg(test)]
#[path = "fsutil_tests.rs"]
mod tests;
