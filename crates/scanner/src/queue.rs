// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bounded registration queue bridging the scanner and the registration
//! worker pool. Single producer, N consumers. `enqueue` blocks when full;
//! `dequeue` blocks when empty. Fairness across consumers is not
//! guaranteed or required.

use crossbeam_channel::{Receiver, Sender};
use stagecoach_core::RegistrationRequest;

pub type RegistrationSender = Sender<RegistrationRequest>;
pub type RegistrationReceiver = Receiver<RegistrationRequest>;

/// Build a fresh bounded registration queue.
///
/// `capacity` bounds how many undelivered requests may sit in the queue
/// before the scanner's `enqueue` call blocks. Cloning either side is cheap
/// and is how every registration worker gets its own consumer handle onto
/// the same queue.
pub fn bounded(capacity: usize) -> (RegistrationSender, RegistrationReceiver) {
    crossbeam_channel::bounded(capacity)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
