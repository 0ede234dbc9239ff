// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown signal shared by the scanner and every worker pool.
//!
//! Built on a `crossbeam_channel` whose sender side is held only by
//! [`ShutdownHandle`]. Dropping (or explicitly triggering) the handle closes
//! the channel, which every cloned [`ShutdownSignal`] observes instantly —
//! including mid-sleep, via `select!` against it — without polling an
//! atomic flag on a timer.

use crossbeam_channel::{Receiver, Sender};

/// Held by the process's main thread; triggering it wakes every worker.
pub struct ShutdownHandle {
    _sender: Sender<()>,
}

impl ShutdownHandle {
    /// Signal shutdown by closing the channel every [`ShutdownSignal`] is
    /// waiting on. Consumes the handle: there is only ever one shutdown.
    pub fn trigger(self) {
        drop(self._sender);
    }
}

/// Cloneable read side, handed to the scanner and every stage worker.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: Receiver<()>,
}

impl ShutdownSignal {
    /// True once shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(crossbeam_channel::TryRecvError::Disconnected))
    }

    /// The underlying receiver, for use in `select!` alongside a work queue
    /// or a sleep timeout.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

/// Build a fresh shutdown signal pair.
pub fn shutdown_pair() -> (ShutdownHandle, ShutdownSignal) {
    let (sender, receiver) = crossbeam_channel::bounded(0);
    (ShutdownHandle { _sender: sender }, ShutdownSignal { receiver })
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
