// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: wires configuration into the scanner, the registration
//! queue, and the three worker pools, then blocks until shutdown.

use crate::signal;
use anyhow::Context;
use stagecoach_core::{
    fsutil, shutdown_pair, ActiveTaskSet, RegexMeasurementIdValidator, RoundRobin, StagecoachConfig, SystemClock,
};
use stagecoach_pipeline::{EvaluationWorker, ProcessingWorker, RegistrationWorker};
use stagecoach_scanner::Scanner;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const PROCESSING_POLL_INTERVAL: Duration = Duration::from_millis(100);
const EVALUATION_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Assemble every worker from `config` and run until a shutdown signal is
/// received, then join every thread (two-phase shutdown: flip the flag,
/// then wait for in-flight work).
pub fn run(config: &StagecoachConfig) -> anyhow::Result<()> {
    let (shutdown_handle, shutdown_signal) = shutdown_pair();

    let (registration_tx, registration_rx) = stagecoach_scanner::bounded(config.registration.queue_capacity);
    let active_tasks = Arc::new(ActiveTaskSet::new());
    let round_robin = Arc::new(RoundRobin::new(config.evaluation.target_dirs.clone()));
    let validator = Arc::new(
        RegexMeasurementIdValidator::new(&config.evaluation.measurement_id_pattern)
            .context("evaluation.measurement_id_pattern failed to compile")?,
    );

    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    let scanner = Scanner::new(
        config.scanner.directory.clone(),
        config.users.registration_directory_name.clone(),
        Duration::from_millis(config.scanner.interval_ms),
        SystemClock,
        registration_tx,
        shutdown_signal.clone(),
    )
    .context("failed to start scanner")?;
    handles.push(std::thread::spawn(move || scanner.run()));

    fsutil::ensure_dir(&config.registration.working_dir).context("creating registration working dir")?;
    for n in 0..config.registration.threads {
        let worker = RegistrationWorker::new(
            config.registration.working_dir.clone(),
            config.registration.target_dir.clone(),
            config.registration.metadata_file_name.clone(),
            config.users.error_directory_name.clone(),
            registration_rx.clone(),
            shutdown_signal.clone(),
        );
        handles.push(
            std::thread::Builder::new()
                .name(format!("registration-{n}"))
                .spawn(move || worker.run())
                .context("failed to spawn registration worker")?,
        );
    }

    fsutil::ensure_dir(&config.processing.working_dir).context("creating processing working dir")?;
    for n in 0..config.processing.threads {
        let worker = ProcessingWorker::new(
            config.processing.working_dir.clone(),
            config.processing.target_dir.clone(),
            Arc::clone(&active_tasks),
            shutdown_signal.clone(),
            PROCESSING_POLL_INTERVAL,
        );
        handles.push(
            std::thread::Builder::new()
                .name(format!("processing-{n}"))
                .spawn(move || worker.run())
                .context("failed to spawn processing worker")?,
        );
    }

    fsutil::ensure_dir(&config.evaluation.working_dir).context("creating evaluation working dir")?;
    for n in 0..config.evaluation.threads {
        let worker = EvaluationWorker::new(
            config.evaluation.working_dir.clone(),
            Arc::clone(&round_robin),
            Arc::clone(&active_tasks),
            Arc::clone(&validator) as Arc<dyn stagecoach_core::MeasurementIdValidator>,
            config.users.error_directory_name.clone(),
            shutdown_signal.clone(),
            EVALUATION_POLL_INTERVAL,
        );
        handles.push(
            std::thread::Builder::new()
                .name(format!("evaluation-{n}"))
                .spawn(move || worker.run())
                .context("failed to spawn evaluation worker")?,
        );
    }

    let signal_watcher = signal::install(shutdown_handle).context("failed to install signal handlers")?;
    handles.push(signal_watcher);

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("a worker thread panicked");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
