//! Core logger types: targets, the registry that owns them, and shared plumbing

pub mod clock;
pub mod config;
pub mod error;
pub mod log_arg;
pub mod log_level;
pub mod metrics;
pub mod registry;
pub mod retry;
pub mod target;

pub use clock::{Clock, ManualClock, SystemClock, METADATA_TIME_FORMAT};
pub use config::{
    DispatchMode, FailureCallback, RegistryConfig, WriteFailure, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_RETENTION_DAYS,
};
pub use error::{LoggerError, Result};
pub use log_arg::{join_args, LogArg};
pub use log_level::LogLevel;
pub use metrics::LoggerMetrics;
pub use registry::{Registry, RegistryBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use target::Target;
