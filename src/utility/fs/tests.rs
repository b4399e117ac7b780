// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::walk::{WalkOptions, latest_mtime};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn set_mtime(path: &Path, time: SystemTime) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open for mtime");
    file.set_modified(time).expect("set mtime");
}

fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

#[test]
fn test_latest_mtime_picks_newest_file() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("data")).unwrap();
    std::fs::write(temp.path().join("config.cpp"), "").unwrap();
    std::fs::write(temp.path().join("data/model.p3d"), "").unwrap();

    let newest = base_time() + Duration::from_secs(1_000_000_000);
    set_mtime(&temp.path().join("data/model.p3d"), newest);

    let summary = latest_mtime(temp.path(), &WalkOptions::for_mod_sources()).unwrap();
    assert_eq!(summary.latest(), Some(newest));
    assert_eq!(summary.error_count(), 0);
    assert_eq!(summary.entries(), 4);
}

#[test]
fn test_latest_mtime_skips_ignored_dirs() {
    let temp = temp_dir();
    for dir in ["node_modules", "out", "target", ".git", "scripts"] {
        std::fs::create_dir(temp.path().join(dir)).unwrap();
        std::fs::write(temp.path().join(dir).join("f.txt"), "").unwrap();
    }

    let far_future = base_time() + Duration::from_secs(2_000_000_000);
    for dir in ["node_modules", "out", "target", ".git"] {
        set_mtime(&temp.path().join(dir).join("f.txt"), far_future);
    }

    let summary = latest_mtime(temp.path(), &WalkOptions::for_mod_sources()).unwrap();
    assert!(summary.latest().is_some_and(|t| t < far_future));
    // root, scripts, scripts/f.txt
    assert_eq!(summary.entries(), 3);
}

#[test]
fn test_latest_mtime_counts_dot_files() {
    let temp = temp_dir();
    std::fs::write(temp.path().join(".editorconfig"), "").unwrap();
    let summary = latest_mtime(temp.path(), &WalkOptions::for_mod_sources()).unwrap();
    assert_eq!(summary.entries(), 2);
}

#[test]
fn test_latest_mtime_missing_root() {
    let temp = temp_dir();
    assert!(latest_mtime(temp.path().join("missing"), &WalkOptions::default()).is_err());
}

#[test]
fn test_is_skipped_dir() {
    let options = WalkOptions::for_mod_sources();
    assert!(options.is_skipped_dir(".vscode"));
    assert!(options.is_skipped_dir("node_modules"));
    assert!(options.is_skipped_dir("out"));
    assert!(!options.is_skipped_dir("Scripts"));
    assert!(!options.is_skipped_dir("output"));

    let keep_dots = WalkOptions::builder().with_skip_dot_dirs(false).build();
    assert!(!keep_dots.is_skipped_dir(".hidden"));
}
