//! engine/registry.rs
//! Engine factory keyed by mode.

use crate::engine::brotli_codec::{BrotliDecodeEngine, BrotliEncodeEngine};
use crate::engine::deflate::{DeflateEngine, InflateEngine};
use crate::engine::gzip::{GunzipEngine, GzipEngine};
use crate::engine::unzip::UnzipEngine;
use crate::engine::CodecEngine;
use crate::modes::Mode;
use crate::options::ResolvedOptions;
use crate::types::ZlibError;

pub fn create_engine(params: &ResolvedOptions) -> Result<Box<dyn CodecEngine>, ZlibError> {
    let engine: Box<dyn CodecEngine> = match params.mode {
        Mode::Deflate => Box::new(DeflateEngine::new(params, true)),
        Mode::DeflateRaw => Box::new(DeflateEngine::new(params, false)),
        Mode::Inflate => Box::new(InflateEngine::new(params, true)),
        Mode::InflateRaw => Box::new(InflateEngine::new(params, false)),
        Mode::Gzip => Box::new(GzipEngine::new(params)),
        Mode::Gunzip => Box::new(GunzipEngine::new(params)),
        Mode::Unzip => Box::new(UnzipEngine::new(params)),
        Mode::BrotliCompress => Box::new(BrotliEncodeEngine::new(params)),
        Mode::BrotliDecompress => Box::new(BrotliDecodeEngine::new(params)),
    };
    Ok(engine)
}
