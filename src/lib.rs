//! # Rust Rotating Logger
//!
//! An in-process asynchronous file logger. Callers hand lines or JSON records
//! to a [`Target`]; the payload is queued and written off the caller's thread
//! to a file named after the current date or hour.
//!
//! ## Features
//!
//! - **Asynchronous**: one bounded queue, one dispatcher thread, producers only
//!   block when the queue is full
//! - **Per-target filtering**: every target has its own severity threshold
//! - **Rotation**: `<path>.YYYYMMDD` (daily) or `<path>.YYYYMMDDHH` (hourly)
//! - **Retention**: expired files are removed as files rotate
//! - **Observable**: write failures are counted and can be sent to a callback

pub mod core;
pub mod dispatch;
pub mod macros;
pub mod rotation;

pub mod prelude {
    pub use crate::core::{
        Clock, DispatchMode, FailureCallback, LogArg, LogLevel, LoggerError, LoggerMetrics,
        ManualClock, Registry, RegistryBuilder, RegistryConfig, Result, SystemClock, Target,
        WriteFailure, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::rotation::{RotationMode, SweepReport};
}

pub use core::{
    Clock, DispatchMode, FailureCallback, LogArg, LogLevel, LoggerError, LoggerMetrics,
    ManualClock, Registry, RegistryBuilder, RegistryConfig, Result, SystemClock, Target,
    WriteFailure, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use rotation::{RotationMode, SweepReport};
