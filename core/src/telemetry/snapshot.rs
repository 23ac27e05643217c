//! telemetry/snapshot.rs
//! Immutable view of a stream's counters with derived ratio and throughput.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::StreamCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub mode: String,
    pub counters: StreamCounters,
    /// `bytes_out / bytes_in`; above 1.0 for decompressing modes.
    pub ratio: f64,
    pub throughput_in_bytes_per_sec: f64,
    pub elapsed: Duration,
}

impl StreamSnapshot {
    pub fn new(mode: &str, counters: &StreamCounters, elapsed: Duration) -> Self {
        let ratio = if counters.bytes_in > 0 {
            counters.bytes_out as f64 / counters.bytes_in as f64
        } else {
            0.0
        };
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        Self {
            mode: mode.to_string(),
            counters: *counters,
            ratio,
            throughput_in_bytes_per_sec: throughput,
            elapsed,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
