// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The processing stage: normalises a task directory so its payload is
//! always a directory, appends to provenance history, and commits to the
//! evaluation stage.

use crate::outcome::{Outcome, StageError};
use crate::parking;
use stagecoach_core::{fsutil, read_provenance, write_provenance, ActiveTaskSet, ShutdownSignal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const INTERVENTIONS_DIR_NAME: &str = "interventions";

pub struct ProcessingWorker {
    working_dir: PathBuf,
    target_dir: PathBuf,
    active_tasks: Arc<ActiveTaskSet>,
    shutdown: ShutdownSignal,
    poll_interval: Duration,
}

impl ProcessingWorker {
    pub fn new(
        working_dir: PathBuf,
        target_dir: PathBuf,
        active_tasks: Arc<ActiveTaskSet>,
        shutdown: ShutdownSignal,
        poll_interval: Duration,
    ) -> Self {
        Self { working_dir, target_dir, active_tasks, shutdown, poll_interval }
    }

    pub fn run(&self) {
        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            match self.poll_once() {
                Ok(true) => continue,
                Ok(false) => {
                    let shutting_down = crossbeam_channel::select! {
                        recv(self.shutdown.receiver()) -> _ => true,
                        default(self.poll_interval) => false,
                    };
                    if shutting_down {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "processing: failed to list working directory, retrying");
                }
            }
        }
        tracing::info!("processing worker: shut down");
    }

    /// One pass over the working directory. Returns whether any (unclaimed)
    /// task directory was found, so `run` can immediately poll again
    /// instead of sleeping while there is still work.
    fn poll_once(&self) -> std::io::Result<bool> {
        let mut found_work = false;
        for task_dir in fsutil::list_subdirs(&self.working_dir)? {
            if task_dir.file_name().map(|n| n == INTERVENTIONS_DIR_NAME).unwrap_or(false) {
                continue;
            }
            if !self.active_tasks.try_claim(task_dir.clone()) {
                continue;
            }
            found_work = true;
            if let Err(e) = self.process_one(&task_dir) {
                tracing::error!(
                    task = %task_dir.display(),
                    error = %e,
                    "processing: task could not be parked, left in place"
                );
            }
            self.active_tasks.release(&task_dir);
        }
        Ok(found_work)
    }

    /// Process a single already-claimed task directory to completion. Public
    /// so integration tests (and callers that want to drive one task
    /// synchronously) don't need the polling loop.
    pub fn process_one(&self, task_dir: &Path) -> Result<Outcome, StageError> {
        match self.try_process(task_dir) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let interventions_dir = self.working_dir.join(INTERVENTIONS_DIR_NAME);
                parking::park_to_intervention(&interventions_dir, task_dir, &e.to_string())?;
                Ok(Outcome::ParkedToIntervention)
            }
        }
    }

    fn try_process(&self, task_dir: &Path) -> Result<Outcome, StageError> {
        let mut provenance = read_provenance(task_dir)
            .map_err(|e| StageError::Provenance { path: task_dir.to_path_buf(), reason: e.to_string() })?;

        normalize_payload(task_dir)?;

        provenance.record_stage(&self.working_dir);
        write_provenance(task_dir, &provenance)?;

        let task_name = task_dir
            .file_name()
            .ok_or_else(|| StageError::Unexpected("task directory has no name".to_string()))?;
        fsutil::ensure_dir(&self.target_dir)?;
        let dest = self.target_dir.join(task_name);
        fsutil::atomic_move(task_dir, &dest)?;
        Ok(Outcome::Advanced)
    }
}

/// Ensure the task's single payload entry is a directory, wrapping a plain
/// file payload in a sibling `<name>_dataset/` directory.
fn normalize_payload(task_dir: &Path) -> Result<(), StageError> {
    let payload = fsutil::find_payload(task_dir)?
        .ok_or_else(|| StageError::Unexpected("task directory does not have exactly one payload".to_string()))?;

    if payload.is_file() {
        let file_name = payload
            .file_name()
            .ok_or_else(|| StageError::Unexpected("payload has no file name".to_string()))?;
        let wrapper_dir = task_dir.join(format!("{}_dataset", file_name.to_string_lossy()));
        std::fs::create_dir_all(&wrapper_dir)?;
        let dest = wrapper_dir.join(file_name);
        fsutil::atomic_move(&payload, &dest)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "processing_tests.rs"]
mod tests;
