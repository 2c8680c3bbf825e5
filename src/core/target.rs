//! Log targets: one rotated file family per base path
//!
//! A [`Target`] owns its severity threshold, rotation mode, retention window
//! and the handle of the file that is current now. Producers call the write
//! entry points from any thread; the payload is queued and written later by
//! the dispatcher through [`Target::flush`].

use super::{
    clock::{Clock, METADATA_TIME_FORMAT},
    config::RegistryConfig,
    error::{LoggerError, Result},
    log_arg::{join_args, LogArg},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    retry::{with_retry, IO_ATTEMPTS},
};
use crate::dispatch::{DispatchJob, DispatchQueue, FlushGuard};
use crate::rotation::{retention, Resolved, RotationMode, RotationState, SweepReport};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

/// Collaborators every target of a registry shares
#[derive(Clone)]
pub(crate) struct TargetContext {
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) metrics: Arc<LoggerMetrics>,
    pub(crate) queue: Arc<DispatchQueue>,
}

pub struct Target {
    path: PathBuf,
    level: AtomicU8,
    metadata: AtomicBool,
    retention_days: AtomicU32,
    mode: RwLock<RotationMode>,
    rotation: Mutex<RotationState>,
    flush_guard: FlushGuard,
    ctx: TargetContext,
    this: Weak<Target>,
}

impl Target {
    pub(crate) fn new(
        path: PathBuf,
        level: LogLevel,
        config: &RegistryConfig,
        ctx: TargetContext,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            path,
            level: AtomicU8::new(level as u8),
            metadata: AtomicBool::new(config.metadata),
            retention_days: AtomicU32::new(config.retention_days),
            mode: RwLock::new(config.rotation),
            rotation: Mutex::new(RotationState::new()),
            flush_guard: FlushGuard::new(),
            ctx,
            this: this.clone(),
        })
    }

    /// Base path; physical files are `<path>.<suffix>`
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether [`Target::write`] prefixes lines with timestamp and caller
    #[must_use]
    pub fn metadata(&self) -> bool {
        self.metadata.load(Ordering::Relaxed)
    }

    pub fn set_metadata(&self, enabled: bool) {
        self.metadata.store(enabled, Ordering::Relaxed);
    }

    #[must_use]
    pub fn rotation(&self) -> RotationMode {
        *self.mode.read()
    }

    /// Change the rotation mode; the next flush opens a file with the new suffix
    pub fn set_rotation(&self, mode: RotationMode) {
        let _rotation = self.rotation.lock();
        *self.mode.write() = mode;
    }

    #[must_use]
    pub fn retention_days(&self) -> u32 {
        self.retention_days.load(Ordering::Relaxed)
    }

    /// Days a daily file is kept; zero turns retention off
    pub fn set_retention_days(&self, days: u32) {
        self.retention_days.store(days, Ordering::Relaxed);
    }

    /// Suffix of the file currently held open, if any
    #[must_use]
    pub fn current_suffix(&self) -> Option<String> {
        self.rotation.lock().suffix().map(str::to_string)
    }

    /// Whether a message at `level` passes this target's threshold
    #[must_use]
    pub fn should_persist(&self, level: LogLevel) -> bool {
        !matches!(level, LogLevel::All | LogLevel::Off) && level.passes(self.level())
    }

    /// Queue one line
    ///
    /// With metadata enabled the line becomes
    /// `YYYY-MM-DD HH:MM:SS <file> <line> <text>`; either way a newline is
    /// appended. The level threshold does not apply here.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::RegistryStopped`] after the registry shut down.
    #[track_caller]
    pub fn write(&self, line: impl AsRef<str>) -> Result<()> {
        let caller = Location::caller();
        let line = line.as_ref();
        let payload = if self.metadata() {
            format!(
                "{} {} {} {}\n",
                self.ctx.clock.now().format(METADATA_TIME_FORMAT),
                short_file(caller.file()),
                caller.line(),
                line
            )
        } else {
            format!("{}\n", line)
        };
        self.enqueue(payload.into_bytes())
    }

    /// Queue the JSON encoding of `value` as one line, without metadata
    ///
    /// # Errors
    ///
    /// Serialization errors are returned before anything is queued.
    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let mut payload = serde_json::to_vec(value)?;
        payload.push(b'\n');
        self.enqueue(payload)
    }

    /// Level-tagged message from positional arguments
    ///
    /// Messages below the threshold are dropped before they reach the queue.
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: &[LogArg]) -> Result<()> {
        if !self.should_persist(level) {
            return Ok(());
        }
        self.write(format!("{} {}", level.tag(), join_args(args)))
    }

    /// Level-tagged message from a format string
    #[track_caller]
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.should_persist(level) {
            return Ok(());
        }
        self.write(format!("{} {}", level.tag(), args))
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, args: &[LogArg]) -> Result<()> {
        self.log(LogLevel::Debug, args)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, args: &[LogArg]) -> Result<()> {
        self.log(LogLevel::Info, args)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, args: &[LogArg]) -> Result<()> {
        self.log(LogLevel::Warn, args)
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, args: &[LogArg]) -> Result<()> {
        self.log(LogLevel::Error, args)
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, args: &[LogArg]) -> Result<()> {
        self.log(LogLevel::Fatal, args)
    }

    #[inline]
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(LogLevel::Debug, args)
    }

    #[inline]
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(LogLevel::Info, args)
    }

    #[inline]
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(LogLevel::Warn, args)
    }

    #[inline]
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(LogLevel::Error, args)
    }

    #[inline]
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(LogLevel::Fatal, args)
    }

    fn enqueue(&self, payload: Vec<u8>) -> Result<()> {
        let target = self.this.upgrade().ok_or(LoggerError::RegistryStopped)?;
        self.ctx.queue.enqueue(DispatchJob { target, payload })
    }

    /// Write `payload` to the file that is current now
    ///
    /// Holds the flush guard for the whole open-or-reuse and write sequence.
    /// The write is retried once; a sweep follows every handle replacement.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or both write attempts fail.
    pub fn flush(&self, payload: &[u8]) -> Result<()> {
        let _permit = self.flush_guard.acquire();
        let now = self.ctx.clock.now();
        let mode = self.rotation();

        let mut rotation = self.rotation.lock();
        let (file, resolved) = rotation.resolve(&self.path, mode, &now)?;

        let written = with_retry(IO_ATTEMPTS, |_| {}, || file.write_all(payload));

        if resolved == Resolved::Replaced {
            self.ctx.metrics.record_rotation();
            self.sweep_at(mode, &now);
        }

        written.map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })
    }

    /// Remove rotated files that are past the retention window
    ///
    /// Opportunistic: failures are listed in the report, never raised.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(self.rotation(), &self.ctx.clock.now())
    }

    fn sweep_at(&self, mode: RotationMode, now: &chrono::DateTime<chrono::Local>) -> SweepReport {
        let report = retention::sweep(&self.path, mode, self.retention_days(), now);
        self.ctx
            .metrics
            .record_sweep(report.removed.len(), report.failed.len());
        report
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("path", &self.path)
            .field("level", &self.level())
            .field("metadata", &self.metadata())
            .field("rotation", &self.rotation())
            .field("retention_days", &self.retention_days())
            .finish()
    }
}

/// Basename of a source path as reported by `Location::file`
fn short_file(file: &str) -> &str {
    file.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(file)
}
