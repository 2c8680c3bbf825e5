//! Rotation modes and suffix computation

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Hourly files are kept for a fixed window regardless of retention days
pub const HOURLY_RETENTION_HOURS: i64 = 12;

/// Granularity of the rotated file family
///
/// # Examples
///
/// ```
/// use rust_rotating_logger::RotationMode;
/// use chrono::{Local, TimeZone};
///
/// let at = Local.with_ymd_and_hms(2025, 1, 8, 9, 30, 0).unwrap();
/// assert_eq!(RotationMode::Daily.suffix(&at), "20250108");
/// assert_eq!(RotationMode::Hourly.suffix(&at), "2025010809");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// One file per calendar day, suffix `YYYYMMDD`
    #[default]
    Daily,
    /// One file per hour, suffix `YYYYMMDDHH`
    Hourly,
}

impl RotationMode {
    /// strftime pattern for this mode's suffix
    #[must_use]
    pub fn pattern(&self) -> &'static str {
        match self {
            RotationMode::Daily => "%Y%m%d",
            RotationMode::Hourly => "%Y%m%d%H",
        }
    }

    /// Number of digits in a suffix of this mode
    #[must_use]
    pub fn suffix_len(&self) -> usize {
        match self {
            RotationMode::Daily => 8,
            RotationMode::Hourly => 10,
        }
    }

    /// Suffix of the file that is current at `at`
    #[must_use]
    pub fn suffix<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        at.format(self.pattern()).to_string()
    }

    /// How long a file of this mode is kept
    ///
    /// `retention_days` of zero disables retention for daily files.
    #[must_use]
    pub fn retention_window(&self, retention_days: u32) -> Option<Duration> {
        match self {
            RotationMode::Daily if retention_days == 0 => None,
            RotationMode::Daily => Some(Duration::days(i64::from(retention_days))),
            RotationMode::Hourly => Some(Duration::hours(HOURLY_RETENTION_HOURS)),
        }
    }

    /// Whether `candidate` has the shape of a suffix of this mode
    pub(crate) fn is_suffix(&self, candidate: &str) -> bool {
        candidate.len() == self.suffix_len() && candidate.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationMode::Daily => write!(f, "Daily"),
            RotationMode::Hourly => write!(f, "Hourly"),
        }
    }
}

/// `<base>.<suffix>`
#[must_use]
pub fn rotated_path(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
