//! Opportunistic removal of expired rotated files
//!
//! A sweep computes the suffix of `now - retention window` and removes that
//! file. Older siblings of the same family (left behind while the process was
//! not running) are removed too; newer files are never touched. Missing files
//! are not failures, and nothing here is retried or propagated: the caller
//! gets a [`SweepReport`] and decides what to do with it.

use super::mode::{rotated_path, RotationMode};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of one retention sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Suffix at and below which files are expired; `None` if retention is off
    pub timeout_suffix: Option<String>,
    /// Files that were removed
    pub removed: Vec<PathBuf>,
    /// Files that exist but could not be removed
    pub failed: Vec<(PathBuf, io::ErrorKind)>,
}

impl SweepReport {
    /// True when no removal failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Suffix of the newest expired file at `now`, or `None` if retention is off
#[must_use]
pub fn timeout_suffix(
    mode: RotationMode,
    retention_days: u32,
    now: &DateTime<Local>,
) -> Option<String> {
    mode.retention_window(retention_days)
        .map(|window| mode.suffix(&(*now - window)))
}

/// Remove every file of `base`'s family whose suffix is expired at `now`
pub fn sweep(
    base: &Path,
    mode: RotationMode,
    retention_days: u32,
    now: &DateTime<Local>,
) -> SweepReport {
    let mut report = SweepReport::default();
    let Some(cutoff) = timeout_suffix(mode, retention_days, now) else {
        return report;
    };

    remove_expired(&rotated_path(base, &cutoff), &mut report);
    for older in older_siblings(base, mode, &cutoff) {
        remove_expired(&older, &mut report);
    }

    report.timeout_suffix = Some(cutoff);
    report
}

fn remove_expired(path: &Path, report: &mut SweepReport) {
    match fs::remove_file(path) {
        Ok(()) => report.removed.push(path.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => report.failed.push((path.to_path_buf(), e.kind())),
    }
}

/// Family members with a suffix strictly older than `cutoff`
///
/// Suffixes are fixed-width digit strings, so string order is time order.
fn older_siblings(base: &Path, mode: RotationMode, cutoff: &str) -> Vec<PathBuf> {
    let Some(stem) = base.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let dir = base
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let suffix = name.to_str()?.strip_prefix(stem)?.strip_prefix('.')?.to_string();
            (mode.is_suffix(&suffix) && suffix.as_str() < cutoff)
                .then(|| rotated_path(base, &suffix))
        })
        .collect()
}
