//! year-progress: how far the current calendar year has progressed, kept in
//! sync with wall-clock time.
//!
//! The crate pairs a pure progress calculation with a cooperative refresh
//! scheduler. A continuous cadence feeds animated outputs and a debounced
//! discrete cadence feeds slow counters. Both are driven by page visibility
//! and suspended around image exports. Snapshot consumers (clipboard text,
//! export) read the last displayed record rather than recomputing it.

pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod render;
pub mod telemetry;

pub use api::{ProgressConfig, ProgressState, RefreshScheduler, VisibilityGate};
pub use crate::core::{ProgressRecord, compute_progress};
pub use error::{ProgressError, ProgressResult};
