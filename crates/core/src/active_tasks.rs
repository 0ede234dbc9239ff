// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared active-tasks set that keeps two workers in the same stage
//! from racing on the same task directory.
//!
//! Directory listing is not a lock: two workers can see the same task
//! directory in the same polling tick. This set is the thing that makes
//! "claim, then act" safe. Processing and evaluation share one instance
//! rather than each stage keeping its own, which is simpler to audit even
//! though the two stages' working directories never overlap in practice.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Process-wide set of task directories currently being handled by some
/// worker, keyed by absolute path.
#[derive(Default)]
pub struct ActiveTaskSet {
    inner: Mutex<HashSet<PathBuf>>,
}

impl ActiveTaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim `path`. Returns `true` if this call claimed it,
    /// `false` if another worker already holds it.
    pub fn try_claim(&self, path: PathBuf) -> bool {
        self.inner.lock().insert(path)
    }

    /// Release a previously claimed path. A no-op if it wasn't held.
    pub fn release(&self, path: &Path) {
        self.inner.lock().remove(path);
    }

    /// True if `path` is currently claimed. Exposed for tests only.
    pub fn is_claimed(&self, path: &Path) -> bool {
        self.inner.lock().contains(path)
    }
}

#[cfg(test)]
#[path = "active_tasks_tests.rs"]
mod tests;
