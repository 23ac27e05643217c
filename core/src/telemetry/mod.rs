//! telemetry/mod.rs
//! Per-stream byte and chunk counters plus an immutable snapshot view.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
