//! Positional arguments for level-tagged messages
//!
//! Each argument is stringified on its own and the non-empty results are
//! joined with single spaces:
//! - integers and floats in their decimal form
//! - booleans as `1` / `0`
//! - timestamps as `YYYY-MM-DD HH:MM:SS`
//! - byte sequences as raw (lossy UTF-8) text
//! - errors as their message
//! - `None` as nothing

use super::clock::METADATA_TIME_FORMAT;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Value type for one positional log argument
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Time(NaiveDateTime),
    Error(String),
    Null,
}

impl LogArg {
    /// Build an argument from an error's message
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        LogArg::Error(err.to_string())
    }

    /// Build an argument from any zone-aware timestamp, rendered in its own zone
    pub fn time<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        LogArg::Time(datetime.naive_local())
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Text(s) | LogArg::Error(s) => f.write_str(s),
            LogArg::Int(i) => write!(f, "{}", i),
            LogArg::UInt(u) => write!(f, "{}", u),
            LogArg::Float(fl) => write!(f, "{}", fl),
            LogArg::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            LogArg::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            LogArg::Time(t) => write!(f, "{}", t.format(METADATA_TIME_FORMAT)),
            LogArg::Null => Ok(()),
        }
    }
}

/// Stringify every argument and join the non-empty ones with single spaces
pub fn join_args(args: &[LogArg]) -> String {
    let mut out = String::new();
    for arg in args {
        let rendered = arg.to_string();
        if rendered.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&rendered);
    }
    out
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(v: $t) -> Self {
                LogArg::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(v: $t) -> Self {
                LogArg::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for LogArg {
    fn from(v: f32) -> Self {
        LogArg::Float(f64::from(v))
    }
}

impl From<f64> for LogArg {
    fn from(v: f64) -> Self {
        LogArg::Float(v)
    }
}

impl From<bool> for LogArg {
    fn from(b: bool) -> Self {
        LogArg::Bool(b)
    }
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Text(s)
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Text(s.to_string())
    }
}

impl From<&String> for LogArg {
    fn from(s: &String) -> Self {
        LogArg::Text(s.clone())
    }
}

impl From<&[u8]> for LogArg {
    fn from(bytes: &[u8]) -> Self {
        LogArg::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for LogArg {
    fn from(bytes: Vec<u8>) -> Self {
        LogArg::Bytes(bytes)
    }
}

impl From<DateTime<Local>> for LogArg {
    fn from(t: DateTime<Local>) -> Self {
        LogArg::time(&t)
    }
}

impl From<DateTime<Utc>> for LogArg {
    fn from(t: DateTime<Utc>) -> Self {
        LogArg::time(&t)
    }
}

impl From<NaiveDateTime> for LogArg {
    fn from(t: NaiveDateTime) -> Self {
        LogArg::Time(t)
    }
}

impl<T: Into<LogArg>> From<Option<T>> for LogArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(LogArg::Null, Into::into)
    }
}
