// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stagecoach_core::shutdown_pair;
use stagecoach_core::FakeClock;
use tempfile::TempDir;

fn touch(path: &std::path::Path) {
    std::fs::write(path, b"x").unwrap();
}

#[test]
fn missing_root_fails_fast() {
    let root = PathBuf::from("/does/not/exist/anywhere");
    let (tx, _rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let err = Scanner::new(
        root.clone(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap_err();
    match err {
        ScannerError::RootMissing(p) => assert_eq!(p, root),
    }
}

#[test]
fn enqueues_one_request_per_new_entry() {
    let tmp = TempDir::new().unwrap();
    let user_dir = tmp.path().join("alice");
    let drop_folder = user_dir.join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();
    touch(&drop_folder.join("reads.fastq"));

    let (tx, rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();

    let req = rx.try_recv().unwrap();
    assert_eq!(req.target_path, drop_folder.join("reads.fastq"));
    assert_eq!(req.origin_path, drop_folder);
    assert_eq!(req.user_path, user_dir);
    assert!(rx.try_recv().is_err());
    assert_eq!(submitted.len(), 1);
}

#[test]
fn same_entry_unchanged_mtime_is_enqueued_exactly_once_across_many_ticks() {
    let tmp = TempDir::new().unwrap();
    let drop_folder = tmp.path().join("alice").join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();
    touch(&drop_folder.join("reads.fastq"));

    let (tx, rx) = crossbeam_channel::bounded(64);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    for _ in 0..10 {
        scanner.scan_once(&mut known, &mut submitted).unwrap();
    }

    let mut count = 0;
    while rx.try_recv().is_ok() {
        count += 1;
    }
    assert_eq!(count, 1, "expected exactly one enqueue across ten identical ticks");
}

#[test]
fn user_directory_without_drop_folder_is_ignored() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("bob")).unwrap();

    let (tx, rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn hidden_entries_in_drop_folder_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let drop_folder = tmp.path().join("alice").join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();
    touch(&drop_folder.join(".DS_Store"));

    let (tx, rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn empty_drop_folder_produces_zero_requests_not_a_failure() {
    let tmp = TempDir::new().unwrap();
    let drop_folder = tmp.path().join("alice").join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();

    let (tx, rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn drop_folder_created_after_startup_is_picked_up_on_a_later_tick() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("alice")).unwrap();

    let (tx, rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert!(known.is_empty());

    let drop_folder = tmp.path().join("alice").join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();
    touch(&drop_folder.join("reads.fastq"));

    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert_eq!(known.len(), 1);
    assert!(rx.try_recv().is_ok());
}

#[test]
fn pruned_drop_folder_no_longer_tracked() {
    let tmp = TempDir::new().unwrap();
    let drop_folder = tmp.path().join("alice").join("registration");
    std::fs::create_dir_all(&drop_folder).unwrap();

    let (tx, _rx) = crossbeam_channel::bounded(8);
    let (_handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_millis(10),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let mut known = HashSet::new();
    let mut submitted = HashSet::new();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert_eq!(known.len(), 1);

    std::fs::remove_dir_all(tmp.path().join("alice")).unwrap();
    scanner.scan_once(&mut known, &mut submitted).unwrap();
    assert!(known.is_empty());
}

#[test]
fn run_exits_promptly_once_shutdown_is_triggered() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("alice")).unwrap();

    let (tx, _rx) = crossbeam_channel::bounded(8);
    let (handle, signal) = shutdown_pair();
    let scanner = Scanner::new(
        tmp.path().to_path_buf(),
        "registration".to_string(),
        Duration::from_secs(30),
        FakeClock::new(),
        tx,
        signal,
    )
    .unwrap();

    let join = std::thread::spawn(move || scanner.run());
    std::thread::sleep(Duration::from_millis(20));
    handle.trigger();
    join.join().unwrap();
}
