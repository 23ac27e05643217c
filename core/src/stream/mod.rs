//! stream/mod.rs
//! Threaded stream facade: a worker owns the transform, writes and flushes
//! are queued in submission order, results come back as events.

pub mod pipe;
mod worker;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use crossbeam::channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, trace};

use crate::modes::Mode;
use crate::options::{FlushMode, ResolvedOptions, ZlibOptions};
use crate::transform::ZlibTransform;
use crate::types::ZlibError;
use crate::utils::ZlibInput;

pub use pipe::{pipe, pipe_reader};
use worker::{run_stream_worker, StreamOp};

/// Pending operations accepted before `write` blocks.
pub const DEFAULT_QUEUE_CAP: usize = 16;

pub type FlushCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Data(Bytes),
    Error(ZlibError),
    /// Terminal write completed; no more data follows.
    End,
    /// Emitted once per `close` call.
    Close,
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Data(_))
    }
}

#[derive(Default)]
pub(crate) struct StreamFlags {
    pub(crate) ended: AtomicBool,
    pub(crate) errored: AtomicBool,
    pub(crate) closed: AtomicBool,
    pub(crate) bytes_written: AtomicU64,
    /// Serializes worker events against `close`.
    pub(crate) gate: Mutex<()>,
}

pub struct ZlibStream {
    mode: Mode,
    ops: Option<Sender<StreamOp>>,
    events_tx: Sender<StreamEvent>,
    events_rx: Receiver<StreamEvent>,
    flags: Arc<StreamFlags>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ZlibStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibStream")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn defer(callback: FlushCallback) {
    thread::spawn(callback);
}

impl ZlibStream {
    /// Engine init errors surface here, before any worker is started.
    pub fn new(mode: Mode, options: &ZlibOptions) -> Result<Self, ZlibError> {
        Self::with_params(options.resolve(mode)?)
    }

    pub fn with_params(params: ResolvedOptions) -> Result<Self, ZlibError> {
        let mode = params.mode;
        let transform = ZlibTransform::with_params(params)?;

        let (ops_tx, ops_rx) = bounded::<StreamOp>(DEFAULT_QUEUE_CAP);
        let (events_tx, events_rx) = unbounded::<StreamEvent>();
        let flags = Arc::new(StreamFlags::default());

        let worker = {
            let tx = events_tx.clone();
            let flags = flags.clone();
            thread::Builder::new()
                .name(format!("zstream-{}", mode.name().to_ascii_lowercase()))
                .spawn(move || run_stream_worker(transform, ops_rx, tx, flags))?
        };
        debug!("[STREAM] {} opened", mode);

        Ok(Self {
            mode,
            ops: Some(ops_tx),
            events_tx,
            events_rx,
            flags,
            worker: Some(worker),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Input bytes the worker has consumed so far.
    pub fn bytes_written(&self) -> u64 {
        self.flags.bytes_written.load(Ordering::SeqCst)
    }

    pub fn is_ended(&self) -> bool {
        self.flags.ended.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.flags.closed.load(Ordering::SeqCst)
    }

    pub fn has_error(&self) -> bool {
        self.flags.errored.load(Ordering::SeqCst)
    }

    fn send(&self, op: StreamOp) -> Result<(), ZlibError> {
        let ops = self
            .ops
            .as_ref()
            .ok_or_else(|| ZlibError::State(format!("{}: stream is closed", self.mode)))?;
        ops.send(op)
            .map_err(|_| ZlibError::State(format!("{}: stream worker has exited", self.mode)))
    }

    pub fn write(&self, chunk: impl Into<Bytes>) -> Result<(), ZlibError> {
        if self.is_closed() {
            return Err(ZlibError::State(format!("{}: stream is closed", self.mode)));
        }
        if self.has_error() {
            return Err(ZlibError::State(format!("{}: stream already failed", self.mode)));
        }
        if self.is_ended() {
            return Err(ZlibError::State(format!("{}: write after end", self.mode)));
        }
        let chunk = chunk.into();
        trace!("[STREAM] {} queue chunk {}", self.mode, chunk.len());
        self.send(StreamOp::Chunk(chunk))
    }

    /// Normalize `input` and queue it.
    pub fn write_input(&self, input: impl Into<ZlibInput>) -> Result<(), ZlibError> {
        self.write(input.into().into_bytes()?)
    }

    /// Queue an explicit flush (default `FullFlush`) behind prior writes.
    /// After `end`, close or failure the callback is still invoked, later and
    /// on another thread.
    pub fn flush(
        &self,
        kind: Option<FlushMode>,
        callback: Option<FlushCallback>,
    ) -> Result<(), ZlibError> {
        let kind = kind.unwrap_or(FlushMode::FullFlush);
        if self.is_ended() || self.is_closed() || self.has_error() {
            if let Some(cb) = callback {
                self.schedule(cb);
            }
            return Ok(());
        }
        self.send(StreamOp::Flush(kind, callback))
    }

    fn schedule(&self, callback: FlushCallback) {
        match &self.ops {
            Some(ops) if !self.is_closed() => {
                if let Err(rejected) = ops.send(StreamOp::Notify(callback)) {
                    if let StreamOp::Notify(cb) = rejected.into_inner() {
                        defer(cb);
                    }
                }
            }
            _ => defer(callback),
        }
    }

    /// Signal end of input; the worker performs the terminal write.
    pub fn end(&self) -> Result<(), ZlibError> {
        if self.flags.ended.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.send(StreamOp::End)
    }

    /// Release the engine. Every call emits `Close`; the optional callback
    /// runs later on another thread.
    pub fn close(&mut self, callback: Option<FlushCallback>) {
        {
            let _gate = self.flags.gate.lock().unwrap_or_else(PoisonError::into_inner);
            if !self.flags.closed.swap(true, Ordering::SeqCst) {
                debug!("[STREAM] {} close requested", self.mode);
            }
            let _ = self.events_tx.send(StreamEvent::Close);
        }
        self.ops.take();
        if let Some(cb) = callback {
            defer(cb);
        }
    }

    /// Block for the next event.
    pub fn recv(&self) -> Option<StreamEvent> {
        self.events_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<StreamEvent> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<StreamEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Events up to and including the first terminal one.
    pub fn events(&self) -> impl Iterator<Item = StreamEvent> + '_ {
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let ev = self.recv()?;
            done = ev.is_terminal();
            Some(ev)
        })
    }

    /// Collect output until `End`. Requires `end` to have been called.
    pub fn read_to_end(&self) -> Result<Bytes, ZlibError> {
        let mut buf = BytesMut::new();
        for ev in self.events() {
            match ev {
                StreamEvent::Data(chunk) => buf.extend_from_slice(&chunk),
                StreamEvent::End => return Ok(buf.freeze()),
                StreamEvent::Error(e) => return Err(e),
                StreamEvent::Close => break,
            }
        }
        Err(ZlibError::State(format!("{}: closed before end", self.mode)))
    }
}

impl Drop for ZlibStream {
    fn drop(&mut self) {
        self.ops.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn open(mode: Mode, options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    ZlibStream::new(mode, &options.cloned().unwrap_or_default())
}

pub fn create_deflate(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::Deflate, options)
}

pub fn create_inflate(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::Inflate, options)
}

pub fn create_gzip(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::Gzip, options)
}

pub fn create_gunzip(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::Gunzip, options)
}

pub fn create_deflate_raw(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::DeflateRaw, options)
}

pub fn create_inflate_raw(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::InflateRaw, options)
}

pub fn create_unzip(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::Unzip, options)
}

pub fn create_brotli_compress(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::BrotliCompress, options)
}

pub fn create_brotli_decompress(options: Option<&ZlibOptions>) -> Result<ZlibStream, ZlibError> {
    open(Mode::BrotliDecompress, options)
}

/// Stream for a numeric mode id with an explicit level and window size.
pub fn create_stream(mode_id: u8, level: i32, window_bits: i32) -> Result<ZlibStream, ZlibError> {
    let mode = Mode::from_id(mode_id)?;
    ZlibStream::with_params(ResolvedOptions::for_mode(mode, level, window_bits)?)
}
