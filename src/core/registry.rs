//! Target registry and the lifecycle of the write pipeline

use super::{
    clock::{Clock, SystemClock},
    config::{DispatchMode, FailureCallback, RegistryConfig},
    error::{LoggerError, Result},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    retry::{with_retry, IO_ATTEMPTS},
    target::{Target, TargetContext},
};
use crate::dispatch::dispatcher::{self, InFlight};
use crate::dispatch::{DispatchQueue, Reporter};
use crate::rotation::RotationMode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout used when a registry is dropped (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of every [`Target`] and of the dispatch pipeline behind them
///
/// One target exists per distinct path for the registry's lifetime. Lookups
/// share a read lock; creation takes the write lock and re-checks, so racing
/// openers of the same path all get the same instance.
///
/// # Example
///
/// ```no_run
/// use rust_rotating_logger::prelude::*;
///
/// let registry = Registry::new()?;
/// let target = registry.open_target("logs/app", LogLevel::Info)?;
/// target.info(&["server".into(), "started".into()])?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Registry {
    targets: RwLock<HashMap<PathBuf, Arc<Target>>>,
    config: RegistryConfig,
    ctx: TargetContext,
    in_flight: Arc<InFlight>,
    dispatcher: Option<thread::JoinHandle<()>>,
}

impl Registry {
    /// Create a registry with default configuration
    ///
    /// # Errors
    ///
    /// Returns error if the dispatcher thread cannot be started.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn start(
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        on_failure: Option<FailureCallback>,
    ) -> Result<Self> {
        if config.queue_capacity == 0 {
            return Err(LoggerError::config(
                "Registry",
                "queue capacity must be greater than zero",
            ));
        }

        let metrics = Arc::new(LoggerMetrics::new());
        let (queue, receiver) = DispatchQueue::new(config.queue_capacity, Arc::clone(&metrics));
        let reporter = Arc::new(Reporter::new(Arc::clone(&metrics), on_failure));
        let in_flight = Arc::new(InFlight::default());

        let handle = dispatcher::spawn(
            receiver,
            config.dispatch_mode,
            reporter,
            Arc::clone(&in_flight),
        )
        .map_err(|e| LoggerError::io_operation("start dispatcher", "cannot spawn thread", e))?;

        Ok(Self {
            targets: RwLock::new(HashMap::new()),
            config,
            ctx: TargetContext {
                clock,
                metrics,
                queue: Arc::new(queue),
            },
            in_flight,
            dispatcher: Some(handle),
        })
    }

    /// Get the target for `path`, creating it on first use
    ///
    /// Every call makes sure the parent directory exists and sets the
    /// target's threshold to `level`. The first call for a path also runs a
    /// retention sweep.
    ///
    /// # Errors
    ///
    /// Returns error if `path` is empty or its parent directory cannot be
    /// created.
    pub fn open_target(&self, path: impl AsRef<Path>, level: LogLevel) -> Result<Arc<Target>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::config("Target", "path must not be empty"));
        }
        ensure_parent_dir(path)?;

        if let Some(existing) = self.targets.read().get(path) {
            existing.set_level(level);
            return Ok(Arc::clone(existing));
        }

        let (target, created) = {
            let mut targets = self.targets.write();
            match targets.get(path) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let target =
                        Target::new(path.to_path_buf(), level, &self.config, self.ctx.clone());
                    targets.insert(path.to_path_buf(), Arc::clone(&target));
                    (target, true)
                }
            }
        };

        // Disk work stays outside the map lock
        if created {
            target.sweep();
        }
        target.set_level(level);
        Ok(target)
    }

    /// Look up an already opened target
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<Target>> {
        self.targets.read().get(path.as_ref()).cloned()
    }

    /// Base paths of all opened targets
    #[must_use]
    pub fn targets(&self) -> Vec<PathBuf> {
        self.targets.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.read().is_empty()
    }

    /// Jobs waiting in the dispatch queue
    #[must_use]
    pub fn pending(&self) -> usize {
        self.ctx.queue.pending()
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Counters for queued, written and lost payloads and for sweeps
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_rotating_logger::Registry;
    ///
    /// let registry = Registry::new().unwrap();
    /// let metrics = registry.metrics();
    /// println!("Written: {}", metrics.written());
    /// println!("Lost: {} ({:.2}%)", metrics.failed_writes(), metrics.failure_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.ctx.metrics
    }

    /// Drain the queue and stop the dispatcher
    ///
    /// Closes the queue, waits for the dispatcher to hand out every queued job
    /// and for all flushes to finish. Later writes fail with
    /// [`LoggerError::RegistryStopped`].
    ///
    /// # Returns
    ///
    /// `true` if everything finished within `timeout`, `false` otherwise
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.ctx.queue.close();

        let start = Instant::now();
        if let Some(handle) = self.dispatcher.take() {
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Dispatcher thread panicked during shutdown: {:?}", e);
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Dispatcher did not drain within {:?}. Some logs may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(5));
            }
        }

        let remaining = timeout.saturating_sub(start.elapsed());
        if !self.in_flight.wait_idle(remaining) {
            eprintln!(
                "[LOGGER WARNING] {} flushes still running after {:?}. Some logs may be lost.",
                self.in_flight.count(),
                timeout
            );
            return false;
        }

        true
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.targets.read().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if self.dispatcher.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }

        let failed = self.ctx.metrics.failed_writes();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Registry shutting down with {} lost writes (failure rate: {:.2}%)",
                failed,
                self.ctx.metrics.failure_rate()
            );
        }
    }
}

/// Create the parent directory of `path`, retrying once
fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    with_retry(IO_ATTEMPTS, |_| {}, || fs::create_dir_all(parent)).map_err(|e| {
        LoggerError::io_operation(
            "create log directory",
            format!("Failed to create directory '{}'", parent.display()),
            e,
        )
    })
}

/// Builder for constructing a [`Registry`] with a fluent API
///
/// # Example
/// ```
/// use rust_rotating_logger::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .queue_capacity(1_000)
///     .dispatch_mode(DispatchMode::Ordered)
///     .rotation(RotationMode::Hourly)
///     .retention_days(3)
///     .metadata(false)
///     .on_failure(Arc::new(|failure: &WriteFailure| {
///         eprintln!("lost {} bytes: {}", failure.bytes, failure.error);
///     }))
///     .build()
///     .unwrap();
/// assert!(registry.is_empty());
/// ```
pub struct RegistryBuilder {
    config: RegistryConfig,
    clock: Option<Arc<dyn Clock>>,
    on_failure: Option<FailureCallback>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            clock: None,
            on_failure: None,
        }
    }

    /// Replace all plain settings at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Capacity of the bounded dispatch queue
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.config.dispatch_mode = mode;
        self
    }

    /// Retention for targets opened by this registry
    #[must_use = "builder methods return a new value"]
    pub fn retention_days(mut self, days: u32) -> Self {
        self.config.retention_days = days;
        self
    }

    /// Rotation mode for targets opened by this registry
    #[must_use = "builder methods return a new value"]
    pub fn rotation(mut self, mode: RotationMode) -> Self {
        self.config.rotation = mode;
        self
    }

    /// Whether targets opened by this registry start with metadata enabled
    #[must_use = "builder methods return a new value"]
    pub fn metadata(mut self, enabled: bool) -> Self {
        self.config.metadata = enabled;
        self
    }

    /// Time source for suffixes, retention and metadata timestamps
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a callback for payloads lost in the background write path
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    /// Build the Registry and start its dispatcher
    ///
    /// # Errors
    ///
    /// Returns error for a zero queue capacity or if the dispatcher thread
    /// cannot be started.
    pub fn build(self) -> Result<Registry> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        Registry::start(self.config, clock, self.on_failure)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
