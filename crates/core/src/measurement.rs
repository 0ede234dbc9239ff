// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain-identifier validation.
//!
//! The identifier format itself is an external contract (a QBiC measurement
//! id, say) — this module only defines the pluggable predicate interface
//! and a regex-backed default compiled from configuration.

use regex::Regex;

/// Predicate for whether a string is a well-formed domain identifier.
///
/// Kept as a trait (rather than a bare function) so tests and alternate
/// deployments can swap in a different validation strategy without
/// recompiling the evaluation stage.
pub trait MeasurementIdValidator: Send + Sync {
    fn is_valid(&self, measurement_id: &str) -> bool;
}

/// Default validator: a compiled regex from `evaluation.measurement_id_pattern`.
pub struct RegexMeasurementIdValidator {
    pattern: Regex,
}

impl RegexMeasurementIdValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(pattern)? })
    }
}

impl MeasurementIdValidator for RegexMeasurementIdValidator {
    fn is_valid(&self, measurement_id: &str) -> bool {
        self.pattern.is_match(measurement_id)
    }
}

#[cfg(test)]
#[path = "measurement_tests.rs"]
mod tests;
