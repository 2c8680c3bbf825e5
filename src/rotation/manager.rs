//! Rotation state machine for one target
//!
//! States are "no file open" and "file open for suffix S". Every flush asks
//! for the handle that is current now: the cached handle is reused while the
//! suffix matches and the file still exists on disk; otherwise a new handle
//! is opened in append mode and the old one is closed.

use super::mode::{rotated_path, RotationMode};
use crate::core::error::{LoggerError, Result};
use crate::core::retry::{with_retry, IO_ATTEMPTS};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// What [`RotationState::resolve`] had to do to produce the current handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The cached handle was still current
    Reused,
    /// No handle was open; one was opened
    Opened,
    /// A previous handle was closed and replaced
    Replaced,
}

/// Current suffix and the handle opened for it
///
/// The handle always belongs to `suffix`; it is replaced, never retargeted.
#[derive(Debug, Default)]
pub struct RotationState {
    suffix: Option<String>,
    file: Option<File>,
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suffix of the open handle, if any
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Return the handle for the file that is current at `now`
    ///
    /// # Errors
    ///
    /// Returns error if the rotated file cannot be opened after the parent
    /// directory was recreated and the open retried.
    pub fn resolve(
        &mut self,
        base: &Path,
        mode: RotationMode,
        now: &DateTime<Local>,
    ) -> Result<(&mut File, Resolved)> {
        let desired = mode.suffix(now);
        let path = rotated_path(base, &desired);

        // A file removed behind our back is recreated under the same suffix
        let reuse = self.suffix.as_deref() == Some(desired.as_str()) && path.exists();

        let (file, resolved) = match self.file.take() {
            Some(file) if reuse => (file, Resolved::Reused),
            previous => match open_rotated(&path) {
                Ok(file) => {
                    let resolved = if previous.is_some() {
                        Resolved::Replaced
                    } else {
                        Resolved::Opened
                    };
                    (file, resolved)
                }
                Err(e) => {
                    self.file = previous;
                    return Err(e);
                }
            },
        };

        self.suffix = Some(desired);
        Ok((self.file.insert(file), resolved))
    }

    /// Close the open handle, returning to the "no file open" state
    #[cfg(test)]
    pub(crate) fn close(&mut self) {
        self.file = None;
        self.suffix = None;
    }
}

/// Open `path` for append, recreating its parent directory before the retry
fn open_rotated(path: &Path) -> Result<File> {
    with_retry(
        IO_ATTEMPTS,
        |_| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let _ = fs::create_dir_all(parent);
            }
        },
        || OpenOptions::new().create(true).append(true).open(path),
    )
    .map_err(|e| {
        LoggerError::file_appender(
            path.display().to_string(),
            format!("Failed to open: {}", e),
        )
    })
}
