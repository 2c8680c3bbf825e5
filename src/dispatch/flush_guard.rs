//! Per-target exclusive write permit

use parking_lot::{Mutex, MutexGuard};

/// Binary permit: at most one flush per target is in its writing phase
///
/// The permit is released when the returned [`FlushPermit`] is dropped, so
/// every exit path of a flush (including errors and panics) gives it back.
#[derive(Debug, Default)]
pub struct FlushGuard {
    permit: Mutex<()>,
}

/// Proof of holding a target's [`FlushGuard`]
#[must_use = "the permit is released as soon as it is dropped"]
pub struct FlushPermit<'a> {
    _held: MutexGuard<'a, ()>,
}

impl FlushGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the permit is available
    pub fn acquire(&self) -> FlushPermit<'_> {
        FlushPermit {
            _held: self.permit.lock(),
        }
    }

    /// Take the permit only if nobody holds it
    #[cfg(test)]
    pub(crate) fn try_acquire(&self) -> Option<FlushPermit<'_>> {
        self.permit.try_lock().map(|held| FlushPermit { _held: held })
    }

    #[cfg(test)]
    pub(crate) fn is_held(&self) -> bool {
        self.permit.is_locked()
    }
}
