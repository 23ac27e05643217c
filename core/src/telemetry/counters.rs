//! telemetry/counters.rs
//! Mutable counters owned by a transform while it runs.

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounters {
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub flushes: u64,
    /// 1 once the terminal write has produced its output.
    pub finishes: u64,
}

impl StreamCounters {
    /// One input chunk and the output it produced.
    pub fn add_chunk(&mut self, in_len: usize, out_len: usize) {
        self.chunks_in += 1;
        self.bytes_in += in_len as u64;
        self.bytes_out += out_len as u64;
    }

    pub fn add_flush(&mut self, out_len: usize) {
        self.flushes += 1;
        self.bytes_out += out_len as u64;
    }

    pub fn add_finish(&mut self, out_len: usize) {
        self.finishes += 1;
        self.bytes_out += out_len as u64;
    }
}
