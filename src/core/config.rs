//! Registry configuration and failure reporting
//!
//! All configuration is programmatic. [`RegistryConfig`] carries the plain
//! values (and can be embedded in an application's own serde config); the
//! clock and failure callback are attached through the registry builder.

use super::error::LoggerError;
use crate::rotation::RotationMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default dispatch queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;

/// Default number of days a daily file is kept
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// How the dispatcher hands dequeued jobs to the flush path
///
/// # Example
///
/// ```
/// use rust_rotating_logger::DispatchMode;
///
/// assert_eq!(DispatchMode::default(), DispatchMode::Concurrent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Every job is flushed on its own detached thread
    ///
    /// The flush guard keeps writes to one target exclusive, but two jobs for
    /// the same target may reach the file in either order.
    #[default]
    Concurrent,

    /// The dispatcher flushes each job itself, in dequeue order
    ///
    /// Writes to a target land in the order they were enqueued. A slow disk
    /// for one target delays every other target.
    Ordered,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Concurrent => write!(f, "Concurrent"),
            DispatchMode::Ordered => write!(f, "Ordered"),
        }
    }
}

/// Plain configuration values for a registry and the targets it opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Bounded dispatch queue capacity; producers block when it is full
    pub queue_capacity: usize,
    pub dispatch_mode: DispatchMode,
    /// Retention for newly created targets (daily rotation)
    pub retention_days: u32,
    /// Rotation mode for newly created targets
    pub rotation: RotationMode,
    /// Whether newly created targets prefix lines with timestamp and caller
    pub metadata: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dispatch_mode: DispatchMode::default(),
            retention_days: DEFAULT_RETENTION_DAYS,
            rotation: RotationMode::default(),
            metadata: true,
        }
    }
}

/// A payload that could not be written, reported after the retries gave up
#[derive(Debug)]
pub struct WriteFailure {
    /// Base path of the target
    pub target: PathBuf,
    /// Size of the lost payload
    pub bytes: usize,
    pub error: LoggerError,
}

/// Callback type for background write failures
///
/// Called from the flush thread, so it must not block for long.
pub type FailureCallback = Arc<dyn Fn(&WriteFailure) + Send + Sync>;
