// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! Always logs to stdout; additionally logs to a daily-rolling file when
//! `log_file` names one. Falls back to stdout-only with a warning rather
//! than failing startup if the log directory can't be created.

use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// The environment variable naming an optional log file path.
const LOG_FILE_ENV_VAR: &str = "STAGECOACHD_LOG_FILE";

/// Read the configured log file path from the environment, if any.
pub fn log_file_from_env() -> Option<PathBuf> {
    std::env::var_os(LOG_FILE_ENV_VAR).map(PathBuf::from)
}

/// Initialize the global tracing subscriber. The returned guard (if any)
/// must be kept alive for the process's lifetime to flush buffered file
/// writes on exit.
pub fn init(log_file: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(env_filter).compact().init();
        return None;
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let filename = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("stagecoachd.log"));

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("warn: could not create log directory '{}': {e} — falling back to stdout", dir.display());
        tracing_subscriber::fmt().with_env_filter(env_filter).compact().init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    Some(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
