// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn signal_is_not_triggered_before_trigger() {
    let (_handle, signal) = shutdown_pair();
    assert!(!signal.is_triggered());
}

#[test]
fn trigger_is_observed_by_all_clones() {
    let (handle, signal) = shutdown_pair();
    let clone = signal.clone();
    handle.trigger();
    assert!(signal.is_triggered());
    assert!(clone.is_triggered());
}

#[test]
fn select_wakes_immediately_on_trigger() {
    let (handle, signal) = shutdown_pair();
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(10));
        handle.trigger();
    });

    let woke_via_shutdown = crossbeam_channel::select! {
        recv(signal.receiver()) -> _ => true,
        default(std::time::Duration::from_secs(5)) => false,
    };
    assert!(woke_via_shutdown, "select should observe the trigger well before the 5s default");
}
