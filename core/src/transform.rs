//! transform.rs
//! Synchronous streaming transform over one session.
//!
//! Lifecycle: `Open -> Writing* -> Flushing -> Closed`.
//! - each chunk is written with the configured `flush` directive and its
//!   output is returned before the next chunk is accepted
//! - `finish` performs the terminal write: empty input, `finish_flush`
//! - any engine error is terminal
//! - `close` is idempotent

use std::time::Instant;

use bytes::Bytes;
use log::{debug, trace};

use crate::engine::Session;
use crate::modes::Mode;
use crate::options::{FlushMode, ResolvedOptions, ZlibOptions};
use crate::telemetry::{StreamCounters, StreamSnapshot};
use crate::types::ZlibError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformState {
    Open,
    Writing,
    Flushing,
    Closed,
}

/// Flush directives captured at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WriteState {
    pub flush: FlushMode,
    pub finish_flush: FlushMode,
}

pub struct ZlibTransform {
    mode: Mode,
    params: ResolvedOptions,
    session: Session,
    write_state: WriteState,
    state: TransformState,
    ended: bool,
    had_error: bool,
    counters: StreamCounters,
    started: Instant,
}

impl ZlibTransform {
    pub fn new(mode: Mode, options: &ZlibOptions) -> Result<Self, ZlibError> {
        Self::with_params(options.resolve(mode)?)
    }

    pub fn with_params(params: ResolvedOptions) -> Result<Self, ZlibError> {
        let session = Session::open_with(&params)?;
        Ok(Self {
            mode: params.mode,
            write_state: WriteState {
                flush: params.flush,
                finish_flush: params.finish_flush,
            },
            params,
            session,
            state: TransformState::Open,
            ended: false,
            had_error: false,
            counters: StreamCounters::default(),
            started: Instant::now(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn write_state(&self) -> WriteState {
        self.write_state
    }

    pub fn chunk_size(&self) -> usize {
        self.params.chunk_size
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.params
    }

    /// Total input bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.counters.bytes_in
    }

    pub fn counters(&self) -> StreamCounters {
        self.counters
    }

    pub fn snapshot(&self) -> StreamSnapshot {
        StreamSnapshot::new(self.mode.name(), &self.counters, self.started.elapsed())
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn has_error(&self) -> bool {
        self.had_error
    }

    fn ensure_writable(&self) -> Result<(), ZlibError> {
        if self.had_error {
            return Err(ZlibError::State(format!("{}: stream already failed", self.mode)));
        }
        if self.ended || self.state == TransformState::Closed {
            return Err(ZlibError::State(format!("{}: write after end", self.mode)));
        }
        Ok(())
    }

    fn write_session(&mut self, input: &[u8], flush: FlushMode) -> Result<Bytes, ZlibError> {
        match self.session.write(input, flush) {
            Ok(out) => Ok(Bytes::from(out)),
            Err(e) => {
                self.had_error = true;
                self.state = TransformState::Closed;
                Err(e)
            }
        }
    }

    /// Process one input chunk.
    pub fn transform(&mut self, chunk: &[u8]) -> Result<Bytes, ZlibError> {
        self.ensure_writable()?;
        self.state = TransformState::Writing;
        let out = self.write_session(chunk, self.write_state.flush)?;
        self.counters.add_chunk(chunk.len(), out.len());
        trace!("[TRANSFORM] {} chunk {} -> {}", self.mode, chunk.len(), out.len());
        Ok(out)
    }

    /// Terminal write. Runs even when no chunk was ever written, so empty
    /// input still yields a complete container.
    pub fn finish(&mut self) -> Result<Bytes, ZlibError> {
        self.ensure_writable()?;
        self.state = TransformState::Flushing;
        self.ended = true;
        let result = self.write_session(&[], self.write_state.finish_flush);
        self.session.close();
        self.state = TransformState::Closed;

        let out = result?;
        self.counters.add_finish(out.len());
        debug!(
            "[TRANSFORM] {} finished in={} out={}",
            self.mode, self.counters.bytes_in, self.counters.bytes_out
        );
        Ok(out)
    }

    /// Out-of-band flush. After the terminal write this is a no-op.
    pub fn flush(&mut self, kind: FlushMode) -> Result<Bytes, ZlibError> {
        if self.ended || self.state == TransformState::Closed {
            return Ok(Bytes::new());
        }
        if self.had_error {
            return Err(ZlibError::State(format!("{}: stream already failed", self.mode)));
        }
        let out = self.write_session(&[], kind)?;
        self.counters.add_flush(out.len());
        Ok(out)
    }

    pub fn close(&mut self) {
        if self.state != TransformState::Closed {
            debug!("[TRANSFORM] {} closed", self.mode);
        }
        self.session.close();
        self.state = TransformState::Closed;
    }
}
