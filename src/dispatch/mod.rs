//! Off-thread delivery of payloads to their targets
//!
//! Producers push [`DispatchJob`]s onto one bounded [`DispatchQueue`]; a single
//! dispatcher thread drains it and hands every job to its target's flush
//! path, where the target's [`FlushGuard`] keeps disk writes exclusive.

pub mod dispatcher;
pub mod flush_guard;
pub mod queue;

pub use dispatcher::Reporter;
pub use flush_guard::{FlushGuard, FlushPermit};
pub use queue::{DispatchJob, DispatchQueue};
