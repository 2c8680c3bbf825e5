//! Date/hour file rotation and retention
//!
//! A target's physical file is `<base>.<suffix>`, where the suffix is derived
//! from the wall clock at write time. [`RotationState`] keeps the open handle
//! for the current suffix; [`retention`] removes files that aged out.

pub mod manager;
pub mod mode;
pub mod retention;

pub use manager::{RotationState, Resolved};
pub use mode::{rotated_path, RotationMode};
pub use retention::SweepReport;
