// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The evaluation stage: the final gate before handoff. Confirms a valid
//! domain identifier, then copies the task into a round-robin downstream
//! inbox and drops a completion marker; on failure, routes the task back to
//! its submitting user.

use crate::outcome::{Outcome, StageError};
use crate::parking;
use stagecoach_core::{
    fsutil, read_provenance, write_provenance, ActiveTaskSet, MeasurementIdValidator, RoundRobin, ShutdownSignal,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const INTERVENTIONS_DIR_NAME: &str = "interventions";

pub struct EvaluationWorker {
    working_dir: PathBuf,
    round_robin: Arc<RoundRobin>,
    active_tasks: Arc<ActiveTaskSet>,
    validator: Arc<dyn MeasurementIdValidator>,
    error_dir_name: String,
    shutdown: ShutdownSignal,
    poll_interval: Duration,
}

impl EvaluationWorker {
    pub fn new(
        working_dir: PathBuf,
        round_robin: Arc<RoundRobin>,
        active_tasks: Arc<ActiveTaskSet>,
        validator: Arc<dyn MeasurementIdValidator>,
        error_dir_name: String,
        shutdown: ShutdownSignal,
        poll_interval: Duration,
    ) -> Self {
        Self { working_dir, round_robin, active_tasks, validator, error_dir_name, shutdown, poll_interval }
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
                    tracing::warn!(error = %e, "evaluation: failed to list working directory, retrying");
                }
            }
        }
        tracing::info!("evaluation worker: shut down");
    }

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
                    "evaluation: task could not be parked, left in place"
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

        if provenance.measurement_id_missing() {
            return self.park_measurement_failure(task_dir, &provenance.user, "Missing QBiC measurement ID");
        }

        // Checked not-missing above; `unwrap_or_default` is defensive only.
        let measurement_id = provenance.measurement_id.clone().unwrap_or_default();
        if !self.validator.is_valid(&measurement_id) {
            let reason = format!("Invalid QBiC measurement ID: {measurement_id}");
            return self.park_measurement_failure(task_dir, &provenance.user, &reason);
        }

        provenance.record_stage(&self.working_dir);
        write_provenance(task_dir, &provenance)?;

        let task_name = task_dir
            .file_name()
            .ok_or_else(|| StageError::Unexpected("task directory has no name".to_string()))?;
        let inbox = self.round_robin.next();
        fsutil::ensure_dir(inbox)?;
        let dest = inbox.join(task_name);
        fsutil::copy_dir_recursive(task_dir, &dest)?;

        let marker_name = format!(".MARKER_is_finished_{}", task_name.to_string_lossy());
        std::fs::write(inbox.join(marker_name), b"")?;

        std::fs::remove_dir_all(task_dir)?;
        Ok(Outcome::Advanced)
    }

    fn park_measurement_failure(
        &self,
        task_dir: &Path,
        user_path: &Path,
        reason: &str,
    ) -> Result<Outcome, StageError> {
        let user_error_dir = user_path.join(&self.error_dir_name);
        parking::park_to_user(&user_error_dir, task_dir, reason)?;
        Ok(Outcome::ParkedToUser)
    }
}

#[cfg(test)]
#[path = "evaluation_tests.rs"]
mod tests;
