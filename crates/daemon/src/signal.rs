// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIGINT/SIGTERM handling.
//!
//! `signal_hook::flag::register` registers a safe-by-construction handler
//! that does nothing but flip an `AtomicBool` — the only thing a signal
//! handler may safely do. A dedicated watcher thread polls that flag and
//! triggers the shared [`ShutdownHandle`] the first time it sees it set,
//! which is what actually wakes every scanner/stage worker blocked on a
//! sleep or a queue receive.

use signal_hook::consts::{SIGINT, SIGTERM};
use stagecoach_core::ShutdownHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Install handlers for SIGINT and SIGTERM and spawn the watcher thread.
/// Consumes `shutdown` — it is triggered exactly once, on the first signal.
pub fn install(shutdown: ShutdownHandle) -> Result<JoinHandle<()>, std::io::Error> {
    let received = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&received))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&received))?;

    Ok(std::thread::spawn(move || loop {
        if received.load(Ordering::SeqCst) {
            tracing::info!("received shutdown signal, stopping workers");
            shutdown.trigger();
            return;
        }
        std::thread::sleep(Duration::from_millis(100));
    }))
}
