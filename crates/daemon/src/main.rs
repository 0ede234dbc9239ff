// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stagecoachd: the filesystem staging pipeline daemon.
//!
//! Usage: `stagecoachd [config-path]` (default `stagecoach.toml`).

use anyhow::Context;
use stagecoach_core::StagecoachConfig;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(default_config_path);

    let config = StagecoachConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let log_file = stagecoachd::logging::log_file_from_env();
    let _guard = stagecoachd::logging::init(log_file.as_deref());

    tracing::info!(config = %config_path.display(), "stagecoachd starting");

    stagecoachd::lifecycle::run(&config)?;

    tracing::info!("stagecoachd stopped");
    Ok(())
}

fn default_config_path() -> PathBuf {
    Path::new("stagecoach.toml").to_path_buf()
}
