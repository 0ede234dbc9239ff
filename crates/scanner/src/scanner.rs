// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scanner: discovers newly-appeared datasets in user drop folders and
//! enqueues exactly-once registration requests for them during the
//! process's lifetime, with re-discovery after restart.

use crate::queue::RegistrationSender;
use stagecoach_core::{fsutil, Clock, RegistrationRequest, ShutdownSignal};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("scanner root directory does not exist: {0}")]
    RootMissing(PathBuf),
}

/// Periodic poller over a root directory of per-user directories.
///
/// The submitted set lives only in this struct's memory for the process's
/// lifetime: on restart it starts empty, so anything still sitting in a
/// drop folder is re-enqueued. That's the intended recovery behavior — the
/// registration stage owns the move out of the drop folder, so a crash
/// before that move means the work must be redone.
pub struct Scanner<C: Clock> {
    root: PathBuf,
    registration_dir_name: String,
    interval: Duration,
    clock: C,
    sender: RegistrationSender,
    shutdown: ShutdownSignal,
}

impl<C: Clock> Scanner<C> {
    pub fn new(
        root: PathBuf,
        registration_dir_name: String,
        interval: Duration,
        clock: C,
        sender: RegistrationSender,
        shutdown: ShutdownSignal,
    ) -> Result<Self, ScannerError> {
        if !root.is_dir() {
            return Err(ScannerError::RootMissing(root));
        }
        Ok(Self { root, registration_dir_name, interval, clock, sender, shutdown })
    }

    /// Run the scan loop until shutdown is triggered.
    pub fn run(&self) {
        let mut known_drop_folders: HashSet<PathBuf> = HashSet::new();
        let mut submitted: HashSet<RegistrationRequest> = HashSet::new();

        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            if let Err(e) = self.scan_once(&mut known_drop_folders, &mut submitted) {
                tracing::warn!(error = %e, "scanner: listing error, skipping this iteration");
            }

            let shutting_down = crossbeam_channel::select! {
                recv(self.shutdown.receiver()) -> _ => true,
                default(self.interval) => false,
            };
            if shutting_down {
                break;
            }
        }
        tracing::info!("scanner: shut down");
    }

    fn scan_once(
        &self,
        known_drop_folders: &mut HashSet<PathBuf>,
        submitted: &mut HashSet<RegistrationRequest>,
    ) -> std::io::Result<()> {
        for user_dir in fsutil::list_subdirs(&self.root)? {
            let drop_folder = user_dir.join(&self.registration_dir_name);
            if drop_folder.is_dir() {
                known_drop_folders.insert(drop_folder);
            }
        }

        // Prune drop folders that no longer exist.
        known_drop_folders.retain(|d| d.is_dir());

        for drop_folder in known_drop_folders.iter() {
            let Some(user_path) = drop_folder.parent() else { continue };
            let entries = match fsutil::list_visible_entries(drop_folder) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        drop_folder = %drop_folder.display(),
                        error = %e,
                        "scanner: failed to list drop folder, skipping it this tick"
                    );
                    continue;
                }
            };

            for target_path in entries {
                let metadata = match std::fs::metadata(&target_path) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(
                            target = %target_path.display(),
                            error = %e,
                            "scanner: failed to stat entry, skipping it this tick"
                        );
                        continue;
                    }
                };
                let last_modified = metadata
                    .modified()
                    .map(stagecoach_core::clock::system_time_to_epoch_ms)
                    .unwrap_or(0);

                let request = RegistrationRequest {
                    detected_at: self.clock.epoch_ms(),
                    last_modified,
                    user_path: user_path.to_path_buf(),
                    origin_path: drop_folder.clone(),
                    target_path,
                };

                if submitted.contains(&request) {
                    continue;
                }

                if self.sender.send(request.clone()).is_err() {
                    tracing::error!("scanner: registration queue disconnected, stopping");
                    return Ok(());
                }
                submitted.insert(request);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
