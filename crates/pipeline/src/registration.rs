// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The registration stage: wraps an enqueued [`RegistrationRequest`] into a
//! freshly-identified task directory and commits it to the processing
//! stage's working directory.

use crate::metadata::{self, ParsedMetadata};
use crate::outcome::{Outcome, StageError};
use crate::parking;
use stagecoach_core::{fsutil, write_provenance, Provenance, RegistrationRequest, ShutdownSignal, TaskId};
use stagecoach_scanner::RegistrationReceiver;
use std::path::{Path, PathBuf};

/// A registration worker. Any number of these drain the same queue; each
/// one loops forever until the queue disconnects or shutdown fires between
/// tasks — a task already in flight always finishes before the worker exits.
pub struct RegistrationWorker {
    working_dir: PathBuf,
    target_dir: PathBuf,
    metadata_file_name: String,
    error_dir_name: String,
    receiver: RegistrationReceiver,
    shutdown: ShutdownSignal,
}

impl RegistrationWorker {
    pub fn new(
        working_dir: PathBuf,
        target_dir: PathBuf,
        metadata_file_name: String,
        error_dir_name: String,
        receiver: RegistrationReceiver,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self { working_dir, target_dir, metadata_file_name, error_dir_name, receiver, shutdown }
    }

    pub fn run(&self) {
        loop {
            let request = crossbeam_channel::select! {
                recv(self.receiver) -> msg => match msg {
                    Ok(request) => request,
                    Err(_) => break,
                },
                recv(self.shutdown.receiver()) -> _ => break,
            };

            match self.try_handle(&request) {
                Ok(_outcome) => {}
                Err(e) => {
                    tracing::error!(
                        target = %request.target_path.display(),
                        error = %e,
                        "registration: task could not be parked, left in place"
                    );
                }
            }
        }
        tracing::info!("registration worker: shut down");
    }

    fn try_handle(&self, request: &RegistrationRequest) -> Result<Outcome, StageError> {
        let task_id = TaskId::new();
        let task_dir = self.working_dir.join(task_id.to_string());

        let parsed = match self.validate(&request.target_path) {
            Ok(parsed) => parsed,
            Err(reason) => return self.wrap_and_park_to_user(request, &task_dir, &reason),
        };

        fsutil::ensure_dir(&self.working_dir)?;
        std::fs::create_dir_all(&task_dir)?;
        if let Err(e) = self.move_payload_in(request, &task_dir) {
            return self.park_io_failure(&task_dir, e);
        }

        let mut provenance = Provenance::new(
            request.origin_path.clone(),
            request.user_path.clone(),
            task_id,
            parsed.dataset_files,
        );
        provenance.measurement_id = parsed.measurement_id;
        provenance.record_stage(&self.working_dir);
        if let Err(e) = write_provenance(&task_dir, &provenance) {
            return self.park_io_failure(&task_dir, StageError::Io(e));
        }

        if let Err(e) = self.commit(&task_dir, task_id) {
            return self.park_io_failure(&task_dir, e);
        }

        Ok(Outcome::Advanced)
    }

    /// Validate the drop-folder entry, returning the parsed metadata to
    /// record in provenance on success, or a human-readable reason on
    /// failure. A plain-file payload has no metadata side-file to read, so
    /// it carries no measurement id yet.
    fn validate(&self, target_path: &Path) -> Result<ParsedMetadata, String> {
        if target_path.is_dir() {
            metadata::parse_and_validate(target_path, &self.metadata_file_name).map_err(|e| e.to_string())
        } else {
            let name = target_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            Ok(ParsedMetadata { dataset_files: vec![name], measurement_id: None })
        }
    }

    fn move_payload_in(&self, request: &RegistrationRequest, task_dir: &Path) -> Result<(), StageError> {
        let basename = request
            .target_path
            .file_name()
            .ok_or_else(|| StageError::Unexpected("drop folder entry has no file name".to_string()))?;
        let dest = task_dir.join(basename);
        fsutil::atomic_move(&request.target_path, &dest).map_err(StageError::Io)
    }

    fn commit(&self, task_dir: &Path, task_id: TaskId) -> Result<(), StageError> {
        fsutil::ensure_dir(&self.target_dir)?;
        let dest = self.target_dir.join(task_id.to_string());
        fsutil::atomic_move(task_dir, &dest)?;
        Ok(())
    }

    /// A validation failure: wrap the still-in-the-drop-folder payload into
    /// a fresh task directory, then park it to the user's error directory.
    fn wrap_and_park_to_user(
        &self,
        request: &RegistrationRequest,
        task_dir: &Path,
        reason: &str,
    ) -> Result<Outcome, StageError> {
        std::fs::create_dir_all(task_dir)?;
        self.move_payload_in(request, task_dir)?;
        let user_error_dir = request.user_path.join(&self.error_dir_name);
        parking::park_to_user(&user_error_dir, task_dir, reason)?;
        Ok(Outcome::ParkedToUser)
    }

    /// A generic I/O failure once the task directory already exists: park
    /// to this stage's own intervention directory rather than lose the
    /// task.
    fn park_io_failure(&self, task_dir: &Path, err: StageError) -> Result<Outcome, StageError> {
        let interventions_dir = self.working_dir.join("interventions");
        let reason = err.to_string();
        parking::park_to_intervention(&interventions_dir, task_dir, &reason)?;
        Ok(Outcome::ParkedToIntervention)
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
