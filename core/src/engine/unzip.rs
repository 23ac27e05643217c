//! engine/unzip.rs
//! Autodetecting decompressor: a gzip magic selects gunzip, anything else
//! is decoded as a zlib stream.

use log::debug;

use crate::constants::GZIP_MAGIC;
use crate::engine::deflate::InflateEngine;
use crate::engine::gzip::GunzipEngine;
use crate::engine::CodecEngine;
use crate::options::{FlushMode, ResolvedOptions};
use crate::types::ZlibError;

pub struct UnzipEngine {
    params: ResolvedOptions,
    sniffed: Vec<u8>,
    inner: Option<Box<dyn CodecEngine>>,
}

impl UnzipEngine {
    pub fn new(params: &ResolvedOptions) -> Self {
        Self {
            params: params.clone(),
            sniffed: Vec::with_capacity(GZIP_MAGIC.len()),
            inner: None,
        }
    }

    /// `Some(true)` for gzip, `Some(false)` for zlib, `None` while undecided.
    fn detect(&self, flush: FlushMode) -> Option<bool> {
        match self.sniffed.as_slice() {
            [first, second, ..] => Some([*first, *second] == GZIP_MAGIC),
            [first] if *first != GZIP_MAGIC[0] => Some(false),
            _ if flush == FlushMode::Finish => Some(false),
            _ => None,
        }
    }
}

impl CodecEngine for UnzipEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        if let Some(inner) = self.inner.as_mut() {
            return inner.write(input, flush, out);
        }

        self.sniffed.extend_from_slice(input);
        let Some(is_gzip) = self.detect(flush) else {
            return Ok(());
        };

        let mode = self.params.mode;
        let mut inner: Box<dyn CodecEngine> = if is_gzip {
            Box::new(GunzipEngine::for_mode(mode, &self.params))
        } else {
            Box::new(InflateEngine::for_mode(mode, &self.params, true))
        };
        debug!(
            "[UNZIP] detected {} input",
            if is_gzip { "gzip" } else { "zlib" }
        );

        let buffered = std::mem::take(&mut self.sniffed);
        let result = inner.write(&buffered, flush, out);
        self.inner = Some(inner);
        result
    }

    fn release(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.release();
        }
    }
}
