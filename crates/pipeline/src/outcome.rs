// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared vocabulary every stage's per-task iteration ends in.
//!
//! Each per-task iteration is a transactional unit that ends in exactly one
//! of {advanced-to-next-stage, parked-to-user-error,
//! parked-to-stage-intervention}. No per-task error is ever allowed to
//! propagate to a worker's main loop unhandled.

use std::path::PathBuf;
use thiserror::Error;

/// How a single task's handling concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Committed into the next stage's working directory (or, for
    /// evaluation, delivered to a downstream inbox).
    Advanced,
    /// Parked under the submitting user's error directory — the user is
    /// expected to fix the problem and resubmit.
    ParkedToUser,
    /// Parked under the stage's own `interventions/` directory — not
    /// something the user can fix.
    ParkedToIntervention,
}

/// Why a task's handling ended the way it did.
///
/// Classifies the failure into the taxonomy every stage shares; the
/// classification is what picks the parking destination.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("provenance error for {path}: {reason}")]
    Provenance { path: PathBuf, reason: String },

    #[error("I/O error during stage transition: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl StageError {
    /// Validation errors park to the user; everything else parks to the
    /// stage's own intervention directory.
    pub fn parks_to_user(&self) -> bool {
        matches!(self, StageError::Validation(_))
    }
}
