//! Wall-clock source for rotation suffixes, retention cutoffs and metadata
//!
//! Every time-derived decision in a registry goes through one [`Clock`], so a
//! [`ManualClock`] can drive rotation and retention deterministically.

use chrono::{DateTime, Duration, Local};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Timestamp format for the metadata prefix and time arguments
pub const METADATA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current local time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
///
/// # Example
///
/// ```
/// use rust_rotating_logger::core::{Clock, ManualClock};
/// use chrono::{Duration, Local, TimeZone};
///
/// let start = Local.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::days(1));
/// assert_eq!(clock.now(), start + Duration::days(1));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.read()
    }
}
