//! Bounded retry for I/O call sites
//!
//! Directory creation, file open and payload writes each get a fixed number of
//! attempts. `on_retry` runs between attempts and can repair state (for
//! example recreating a missing parent directory) before the next try.

/// Attempts used by every retried I/O call in the write path
pub const IO_ATTEMPTS: u32 = 2;

/// Run `op` up to `attempts` times, returning the first success or the last error
///
/// `attempts` of zero is treated as one. `on_retry` receives the failed
/// attempt's error and is not called after the final attempt.
///
/// # Example
///
/// ```
/// use rust_rotating_logger::core::retry::with_retry;
///
/// let mut calls = 0;
/// let result: Result<u32, &str> = with_retry(2, |_| {}, || {
///     calls += 1;
///     if calls == 1 { Err("transient") } else { Ok(calls) }
/// });
/// assert_eq!(result, Ok(2));
/// ```
pub fn with_retry<T, E, R, F>(attempts: u32, mut on_retry: R, mut op: F) -> Result<T, E>
where
    R: FnMut(&E),
    F: FnMut() -> Result<T, E>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                on_retry(&e);
                attempt += 1;
            }
        }
    }
}
