//! The dispatcher thread and the flush executions it launches

use super::queue::DispatchJob;
use crate::core::config::{DispatchMode, FailureCallback, WriteFailure};
use crate::core::metrics::LoggerMetrics;
use crossbeam_channel::Receiver;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Makes background write outcomes observable
///
/// Successes and failures are counted in [`LoggerMetrics`]. Failures also go
/// to the failure callback; without one they are reported on stderr on the
/// first failure and every 1000th after that.
pub struct Reporter {
    metrics: Arc<LoggerMetrics>,
    on_failure: Option<FailureCallback>,
}

impl Reporter {
    pub fn new(metrics: Arc<LoggerMetrics>, on_failure: Option<FailureCallback>) -> Self {
        Self { metrics, on_failure }
    }

    pub fn written(&self) {
        self.metrics.record_written();
    }

    pub fn failed(&self, failure: WriteFailure) {
        let previous = self.metrics.record_failed_write();

        if let Some(ref callback) = self.on_failure {
            callback(&failure);
        } else if previous % 1000 == 0 {
            eprintln!(
                "[LOGGER ERROR] Dropped {} bytes for '{}': {} ({} write failures so far)",
                failure.bytes,
                failure.target.display(),
                failure.error,
                previous + 1
            );
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("metrics", &self.metrics)
            .field("has_callback", &self.on_failure.is_some())
            .finish()
    }
}

/// Count of flush executions that have not finished yet
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

/// Decrements [`InFlight`] when dropped
pub(crate) struct InFlightTicket {
    in_flight: Arc<InFlight>,
}

impl InFlight {
    pub(crate) fn ticket(self: &Arc<Self>) -> InFlightTicket {
        *self.count.lock() += 1;
        InFlightTicket {
            in_flight: Arc::clone(self),
        }
    }

    pub(crate) fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Wait until no flush is running; false if `timeout` elapsed first
    ///
    /// A timeout too large to express as a deadline waits without one.
    pub(crate) fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut count = self.count.lock();
        while *count > 0 {
            match deadline {
                Some(deadline) => {
                    if self.idle.wait_until(&mut count, deadline).timed_out() {
                        return *count == 0;
                    }
                }
                None => self.idle.wait(&mut count),
            }
        }
        true
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        let mut count = self.in_flight.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.in_flight.idle.notify_all();
        }
    }
}

/// Flush one job and report the outcome
pub(crate) fn run_job(job: DispatchJob, reporter: &Reporter) {
    match job.target.flush(&job.payload) {
        Ok(()) => reporter.written(),
        Err(error) => reporter.failed(WriteFailure {
            target: job.target.path().to_path_buf(),
            bytes: job.payload.len(),
            error,
        }),
    }
}

/// Start the dispatcher thread
///
/// It dequeues jobs one at a time in arrival order until the queue is closed
/// and drained. In [`DispatchMode::Concurrent`] each job gets its own flush
/// thread; if that thread cannot be spawned the job is flushed inline.
pub(crate) fn spawn(
    receiver: Receiver<DispatchJob>,
    mode: DispatchMode,
    reporter: Arc<Reporter>,
    in_flight: Arc<InFlight>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("log-dispatcher".to_string())
        .spawn(move || {
            for job in receiver.iter() {
                match mode {
                    DispatchMode::Ordered => {
                        let _ticket = in_flight.ticket();
                        run_job(job, &reporter);
                    }
                    DispatchMode::Concurrent => {
                        launch(job, &reporter, &in_flight);
                    }
                }
            }
        })
}

fn launch(job: DispatchJob, reporter: &Arc<Reporter>, in_flight: &Arc<InFlight>) {
    let slot = Arc::new(Mutex::new(Some(job)));
    let worker_slot = Arc::clone(&slot);
    let worker_reporter = Arc::clone(reporter);
    let ticket = in_flight.ticket();

    let spawned = thread::Builder::new()
        .name("log-flush".to_string())
        .spawn(move || {
            let _ticket = ticket;
            if let Some(job) = worker_slot.lock().take() {
                run_job(job, &worker_reporter);
            }
        });

    if let Err(e) = spawned {
        eprintln!("[LOGGER WARNING] Could not spawn flush thread ({}); flushing inline", e);
        if let Some(job) = slot.lock().take() {
            let _ticket = in_flight.ticket();
            run_job(job, reporter);
        }
    }
}
