//! engine/deflate.rs
//! zlib-wrapped and raw deflate engines over flate2's incremental
//! `Compress` / `Decompress`, plus the drive loops shared with gzip.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use log::{debug, warn};

use crate::constants::{Z_DEFAULT_COMPRESSION, Z_DEFAULT_MEMLEVEL, Z_DEFAULT_WINDOWBITS};
use crate::engine::{output_step, CodecEngine};
use crate::modes::Mode;
use crate::options::{FlushMode, ResolvedOptions, Strategy};
use crate::types::ZlibError;

const ZLIB_CM_DEFLATE: u8 = 8;

pub(crate) fn compression_level(level: i32) -> Compression {
    if level == Z_DEFAULT_COMPRESSION {
        Compression::default()
    } else {
        Compression::new(level as u32)
    }
}

pub(crate) fn compress_flush(flush: FlushMode) -> FlushCompress {
    match flush {
        FlushMode::NoFlush => FlushCompress::None,
        FlushMode::PartialFlush => FlushCompress::Partial,
        FlushMode::SyncFlush | FlushMode::Block | FlushMode::Trees => FlushCompress::Sync,
        FlushMode::FullFlush => FlushCompress::Full,
        FlushMode::Finish => FlushCompress::Finish,
    }
}

/// Options the flate2 backend accepts but cannot act on.
pub(crate) fn note_unwired(params: &ResolvedOptions) {
    if params.window_bits != Z_DEFAULT_WINDOWBITS {
        warn!(
            "[ENGINE] {}: windowBits {} validated, backend window fixed at 15",
            params.mode, params.window_bits
        );
    }
    if params.mem_level != Z_DEFAULT_MEMLEVEL || params.strategy != Strategy::Default {
        warn!(
            "[ENGINE] {}: memLevel/strategy not supported by backend, using defaults",
            params.mode
        );
    }
    if params.dictionary.is_some() {
        warn!("[ENGINE] {}: preset dictionary ignored", params.mode);
    }
}

/// Feed `input` to `c` until it is consumed and `flush` is satisfied.
/// Returns `true` once the stream end has been written.
pub(crate) fn run_compress(
    c: &mut Compress,
    input: &[u8],
    flush: FlushMode,
    reserve: usize,
    out: &mut Vec<u8>,
) -> Result<bool, String> {
    let directive = compress_flush(flush);
    let finishing = flush == FlushMode::Finish;
    let mut consumed = 0usize;

    loop {
        out.reserve(reserve);
        let (in_before, out_before) = (c.total_in(), c.total_out());
        let status = c
            .compress_vec(&input[consumed..], out, directive)
            .map_err(|e| e.to_string())?;
        let used = (c.total_in() - in_before) as usize;
        let produced = c.total_out() - out_before;
        consumed += used;

        if matches!(status, Status::StreamEnd) {
            return Ok(true);
        }
        let room_left = out.len() < out.capacity();
        if !finishing && consumed >= input.len() && room_left {
            return Ok(false);
        }
        if used == 0 && produced == 0 && room_left {
            return Ok(false);
        }
    }
}

/// Feed `input` to `d` until it is consumed or the stream ends.
/// Returns `(stream_end, bytes_consumed)`.
pub(crate) fn run_decompress(
    d: &mut Decompress,
    input: &[u8],
    flush: FlushMode,
    reserve: usize,
    out: &mut Vec<u8>,
) -> Result<(bool, usize), String> {
    let directive = match flush {
        FlushMode::NoFlush => FlushDecompress::None,
        _ => FlushDecompress::Sync,
    };
    let mut consumed = 0usize;

    loop {
        out.reserve(reserve);
        let (in_before, out_before) = (d.total_in(), d.total_out());
        let status = d
            .decompress_vec(&input[consumed..], out, directive)
            .map_err(|e| e.to_string())?;
        let used = (d.total_in() - in_before) as usize;
        let produced = d.total_out() - out_before;
        consumed += used;

        if matches!(status, Status::StreamEnd) {
            return Ok((true, consumed));
        }
        let room_left = out.len() < out.capacity();
        if consumed >= input.len() && room_left {
            return Ok((false, consumed));
        }
        if used == 0 && produced == 0 && room_left {
            return Ok((false, consumed));
        }
    }
}

/// `Deflate` (zlib header) and `DeflateRaw`.
pub struct DeflateEngine {
    mode: Mode,
    inner: Compress,
    chunk_size: usize,
    finished: bool,
}

impl DeflateEngine {
    pub fn new(params: &ResolvedOptions, zlib_header: bool) -> Self {
        note_unwired(params);
        Self {
            mode: params.mode,
            inner: Compress::new(compression_level(params.level), zlib_header),
            chunk_size: output_step(params.chunk_size),
            finished: false,
        }
    }
}

impl CodecEngine for DeflateEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        if self.finished {
            if input.is_empty() {
                return Ok(());
            }
            return Err(ZlibError::State(format!("{}: write after stream end", self.mode)));
        }
        self.finished = run_compress(&mut self.inner, input, flush, self.chunk_size, out)
            .map_err(|m| ZlibError::data(self.mode.name(), m))?;
        Ok(())
    }
}

/// `Inflate` (zlib header) and `InflateRaw`.
pub struct InflateEngine {
    mode: Mode,
    inner: Decompress,
    chunk_size: usize,
    /// Largest window the caller accepts; checked against the zlib header.
    max_window_bits: Option<i32>,
    ended: bool,
}

impl InflateEngine {
    pub fn new(params: &ResolvedOptions, zlib_header: bool) -> Self {
        Self::for_mode(params.mode, params, zlib_header)
    }

    /// Engine reporting errors under `mode` (used by `Unzip`).
    pub(crate) fn for_mode(mode: Mode, params: &ResolvedOptions, zlib_header: bool) -> Self {
        if params.dictionary.is_some() {
            warn!("[ENGINE] {}: preset dictionary ignored", mode);
        }
        Self {
            mode,
            inner: Decompress::new(zlib_header),
            chunk_size: output_step(params.chunk_size),
            max_window_bits: zlib_header.then_some(params.window_bits),
            ended: false,
        }
    }
}

impl InflateEngine {
    /// CINFO of the zlib header names the encoder's window; reject windows
    /// larger than the configured `windowBits`.
    fn check_header_window(&mut self, input: &[u8]) -> Result<(), ZlibError> {
        let (Some(max), Some(&cmf)) = (self.max_window_bits, input.first()) else {
            return Ok(());
        };
        self.max_window_bits = None;
        let window_bits = i32::from(cmf >> 4) + 8;
        if cmf & 0x0f == ZLIB_CM_DEFLATE && window_bits > max {
            return Err(ZlibError::data(self.mode.name(), "invalid window size"));
        }
        Ok(())
    }
}

impl CodecEngine for InflateEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        self.check_header_window(input)?;
        if !self.ended {
            let (ended, used) = run_decompress(&mut self.inner, input, flush, self.chunk_size, out)
                .map_err(|m| ZlibError::data(self.mode.name(), m))?;
            self.ended = ended;
            if ended && used < input.len() {
                debug!(
                    "[ENGINE] {}: {} trailing bytes after stream end ignored",
                    self.mode,
                    input.len() - used
                );
            }
        } else if !input.is_empty() {
            debug!(
                "[ENGINE] {}: {} trailing bytes after stream end ignored",
                self.mode,
                input.len()
            );
        }

        if flush == FlushMode::Finish && !self.ended {
            return Err(ZlibError::data(self.mode.name(), "unexpected end of file"));
        }
        Ok(())
    }
}
