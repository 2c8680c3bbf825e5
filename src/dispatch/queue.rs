//! Bounded process-wide dispatch queue

use crate::core::error::{LoggerError, Result};
use crate::core::metrics::LoggerMetrics;
use crate::core::target::Target;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// One pending write: the payload bytes and the target they belong to
///
/// Created at enqueue time and consumed exactly once by the dispatcher.
pub struct DispatchJob {
    pub target: Arc<Target>,
    pub payload: Vec<u8>,
}

impl fmt::Debug for DispatchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchJob")
            .field("target", &self.target.path())
            .field("bytes", &self.payload.len())
            .finish()
    }
}

/// Producer side of the bounded queue
///
/// A full queue blocks the producer until the dispatcher frees a slot; jobs
/// are never dropped and the queue never grows past its capacity.
pub struct DispatchQueue {
    sender: RwLock<Option<Sender<DispatchJob>>>,
    capacity: usize,
    metrics: Arc<LoggerMetrics>,
}

impl DispatchQueue {
    /// Create the queue and the receiver the dispatcher drains
    pub fn new(capacity: usize, metrics: Arc<LoggerMetrics>) -> (Self, Receiver<DispatchJob>) {
        let (sender, receiver) = bounded(capacity);
        let queue = Self {
            sender: RwLock::new(Some(sender)),
            capacity,
            metrics,
        };
        (queue, receiver)
    }

    /// Place a job on the queue, blocking while the queue is full
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::RegistryStopped`] once the queue was closed.
    pub fn enqueue(&self, job: DispatchJob) -> Result<()> {
        // Send on a clone so a blocked producer does not hold the lock close() needs
        let sender = self
            .sender
            .read()
            .as_ref()
            .cloned()
            .ok_or(LoggerError::RegistryStopped)?;

        match sender.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                self.metrics.record_block();
                sender.send(job).map_err(|_| LoggerError::RegistryStopped)?;
            }
            Err(TrySendError::Disconnected(_)) => return Err(LoggerError::RegistryStopped),
        }

        self.metrics.record_enqueued();
        Ok(())
    }

    /// Stop accepting jobs; the dispatcher exits after draining what is queued
    pub fn close(&self) {
        drop(self.sender.write().take());
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Jobs waiting for the dispatcher
    #[must_use]
    pub fn pending(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("capacity", &self.capacity)
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}
