//! engine/brotli_codec.rs
//! Brotli engines over the `brotli` crate's writer adapters. Output lands in
//! a shared sink and is drained after every call.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use ::brotli::{CompressorWriter, DecompressorWriter};
use log::{debug, warn};

use crate::constants::{BROTLI_PARAM_LGWIN, BROTLI_PARAM_QUALITY};
use crate::engine::{output_step, CodecEngine};
use crate::modes::Mode;
use crate::options::{FlushMode, ResolvedOptions};
use crate::types::ZlibError;

/// Write target shared between a brotli adapter and its engine.
#[derive(Clone, Default)]
pub struct SharedSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedSink {
    pub fn drain_into(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "brotli sink poisoned"))?;
        out.append(&mut guard);
        Ok(())
    }
}

impl Write for SharedSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "brotli sink poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct BrotliEncodeEngine {
    mode: Mode,
    writer: Option<CompressorWriter<SharedSink>>,
    sink: SharedSink,
}

impl BrotliEncodeEngine {
    pub fn new(params: &ResolvedOptions) -> Self {
        let wired = [BROTLI_PARAM_QUALITY, BROTLI_PARAM_LGWIN];
        if params.params.keys().any(|k| !wired.contains(k)) {
            warn!("[BROTLI] only quality and lgwin params are applied");
        }
        let sink = SharedSink::default();
        let writer = CompressorWriter::new(
            sink.clone(),
            output_step(params.chunk_size),
            params.level as u32,
            params.window_bits as u32,
        );
        debug!(
            "[BROTLI] encoder quality={} lgwin={}",
            params.level, params.window_bits
        );
        Self {
            mode: params.mode,
            writer: Some(writer),
            sink,
        }
    }
}

impl CodecEngine for BrotliEncodeEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        let name = self.mode.name();
        let Some(writer) = self.writer.as_mut() else {
            if input.is_empty() {
                return Ok(());
            }
            return Err(ZlibError::State(format!("{name}: write after stream end")));
        };

        writer
            .write_all(input)
            .map_err(|e| ZlibError::data(name, e.to_string()))?;
        match flush {
            FlushMode::NoFlush => {}
            FlushMode::Finish => {
                if let Some(writer) = self.writer.take() {
                    // Consuming the adapter emits the final meta-block.
                    let _ = writer.into_inner();
                }
            }
            _ => writer
                .flush()
                .map_err(|e| ZlibError::data(name, e.to_string()))?,
        }
        self.sink
            .drain_into(out)
            .map_err(|e| ZlibError::data(name, e.to_string()))
    }

    fn release(&mut self) {
        self.writer = None;
    }
}

pub struct BrotliDecodeEngine {
    mode: Mode,
    writer: Option<DecompressorWriter<SharedSink>>,
    sink: SharedSink,
}

impl BrotliDecodeEngine {
    pub fn new(params: &ResolvedOptions) -> Self {
        let sink = SharedSink::default();
        Self {
            mode: params.mode,
            writer: Some(DecompressorWriter::new(sink.clone(), output_step(params.chunk_size))),
            sink,
        }
    }
}

impl CodecEngine for BrotliDecodeEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        let name = self.mode.name();
        let Some(writer) = self.writer.as_mut() else {
            if !input.is_empty() {
                debug!("[BROTLI] {} bytes after stream end ignored", input.len());
            }
            return Ok(());
        };

        writer
            .write_all(input)
            .map_err(|e| ZlibError::data(name, e.to_string()))?;
        match flush {
            FlushMode::NoFlush => {}
            FlushMode::Finish => {
                if let Some(writer) = self.writer.take() {
                    if writer.into_inner().is_err() {
                        return Err(ZlibError::data(name, "unexpected end of file"));
                    }
                }
            }
            _ => writer
                .flush()
                .map_err(|e| ZlibError::data(name, e.to_string()))?,
        }
        self.sink
            .drain_into(out)
            .map_err(|e| ZlibError::data(name, e.to_string()))
    }

    fn release(&mut self) {
        self.writer = None;
    }
}
