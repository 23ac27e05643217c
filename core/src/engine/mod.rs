//! engine/mod.rs
//! Codec engine adapter: a session owns one engine instance for one mode
//! and turns (bytes, flush directive) into output bytes.

pub mod brotli_codec;
pub mod deflate;
pub mod gzip;
pub mod registry;
pub mod unzip;

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};

use crate::constants::*;
use crate::modes::{Family, Mode};
use crate::options::{FlushMode, ResolvedOptions};
use crate::types::ZlibError;

pub use registry::create_engine;

/// One incremental codec. Output produced by a call is appended to `out`.
pub trait CodecEngine: Send {
    fn write(&mut self, input: &[u8], flush: FlushMode, out: &mut Vec<u8>) -> Result<(), ZlibError>;

    /// Drop internal state. Called at most once, by `Session::close`.
    fn release(&mut self) {}
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Upper bound on the output space reserved per engine step.
const MAX_OUTPUT_STEP: usize = 1 << 20;

/// Output space reserved per engine step for a given chunk size.
pub(crate) fn output_step(chunk_size: usize) -> usize {
    chunk_size.min(MAX_OUTPUT_STEP)
}

/// Engine ranges checked at open.
pub fn validate(params: &ResolvedOptions) -> Result<(), ZlibError> {
    let mode = params.mode;
    let name = mode.name();
    match mode.profile().family {
        Family::Zlib => {
            if mode.is_compress() && !(Z_MIN_LEVEL..=Z_MAX_LEVEL).contains(&params.level) {
                return Err(ZlibError::init(name, format!("invalid level {}", params.level)));
            }
            if !(Z_MIN_WINDOWBITS..=Z_MAX_WINDOWBITS).contains(&params.window_bits) {
                return Err(ZlibError::init(
                    name,
                    format!("invalid windowBits {}", params.window_bits),
                ));
            }
        }
        Family::Brotli => {
            if mode.is_compress() {
                if !(BROTLI_MIN_QUALITY..=BROTLI_MAX_QUALITY).contains(&params.level) {
                    return Err(ZlibError::init(name, format!("invalid quality {}", params.level)));
                }
                let lgwin = params.window_bits;
                if !(BROTLI_MIN_WINDOW_BITS..=BROTLI_MAX_WINDOW_BITS).contains(&lgwin) {
                    return Err(ZlibError::init(
                        name,
                        format!("invalid lgwin {lgwin}"),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// A live engine bound to one mode.
///
/// - `write` after `close` is a state error.
/// - Any engine error closes the session.
/// - `close` is idempotent and also runs on drop.
pub struct Session {
    id: u64,
    mode: Mode,
    engine: Option<Box<dyn CodecEngine>>,
}

impl Session {
    /// Open with mode defaults plus an explicit level and window size.
    pub fn open(mode: Mode, level: i32, window_bits: i32) -> Result<Self, ZlibError> {
        Self::open_with(&ResolvedOptions::for_mode(mode, level, window_bits)?)
    }

    pub fn open_with(params: &ResolvedOptions) -> Result<Self, ZlibError> {
        validate(params)?;
        let engine = create_engine(params)?;
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[SESSION] #{} open {} level={} window_bits={}",
            id, params.mode, params.level, params.window_bits
        );
        Ok(Self {
            id,
            mode: params.mode,
            engine: Some(engine),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    pub fn write(&mut self, input: &[u8], flush: FlushMode) -> Result<Vec<u8>, ZlibError> {
        let engine = self.engine.as_mut().ok_or_else(|| {
            ZlibError::State(format!("{} session #{} is closed", self.mode, self.id))
        })?;

        let mut out = Vec::new();
        match engine.write(input, flush, &mut out) {
            Ok(()) => {
                trace!(
                    "[SESSION] #{} write in={} flush={:?} out={}",
                    self.id,
                    input.len(),
                    flush,
                    out.len()
                );
                Ok(out)
            }
            Err(e) => {
                debug!("[SESSION] #{} failed: {}", self.id, e);
                self.close();
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.release();
            debug!("[SESSION] #{} closed", self.id);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
