//! Logging macros for level-tagged messages.
//!
//! The plain macros take positional arguments that are stringified one by one
//! and joined with spaces; the `*f` macros take a format string like
//! `format!`. Both return the target's `Result`.
//!
//! # Examples
//!
//! ```no_run
//! use rust_rotating_logger::prelude::*;
//! use rust_rotating_logger::{info, warnf};
//!
//! let registry = Registry::new()?;
//! let target = registry.open_target("logs/app", LogLevel::Info)?;
//!
//! // "[INFO] server started on port 8080"
//! info!(target, "server", "started", "on port", 8080)?;
//!
//! // "[WARN] retry 3 of 5"
//! warnf!(target, "retry {} of {}", 3, 5)?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log positional arguments at an explicit level.
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr $(, $arg:expr)* $(,)?) => {
        $target.log($level, &[$($crate::LogArg::from($arg)),*])
    };
}

/// Log a format string at an explicit level.
#[macro_export]
macro_rules! logf {
    ($target:expr, $level:expr, $($arg:tt)+) => {
        $target.logf($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```no_run
/// # use rust_rotating_logger::prelude::*;
/// # let registry = Registry::new().unwrap();
/// # let target = registry.open_target("logs/app", LogLevel::Debug).unwrap();
/// use rust_rotating_logger::debug;
/// debug!(target, "cache", "hit", true).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($target:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($target, $crate::LogLevel::Debug $(, $arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($target:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($target, $crate::LogLevel::Info $(, $arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($target:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($target, $crate::LogLevel::Warn $(, $arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($target:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($target, $crate::LogLevel::Error $(, $arg)*)
    };
}

#[macro_export]
macro_rules! fatal {
    ($target:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($target, $crate::LogLevel::Fatal $(, $arg)*)
    };
}

/// Log a formatted debug-level message.
///
/// # Examples
///
/// ```no_run
/// # use rust_rotating_logger::prelude::*;
/// # let registry = Registry::new().unwrap();
/// # let target = registry.open_target("logs/app", LogLevel::Debug).unwrap();
/// use rust_rotating_logger::debugf;
/// debugf!(target, "queue depth {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! debugf {
    ($target:expr, $($arg:tt)+) => {
        $crate::logf!($target, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! infof {
    ($target:expr, $($arg:tt)+) => {
        $crate::logf!($target, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warnf {
    ($target:expr, $($arg:tt)+) => {
        $crate::logf!($target, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($target:expr, $($arg:tt)+) => {
        $crate::logf!($target, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatalf {
    ($target:expr, $($arg:tt)+) => {
        $crate::logf!($target, $crate::LogLevel::Fatal, $($arg)+)
    };
}
