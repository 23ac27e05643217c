//! oneshot.rs
//! Whole-buffer calls: open a session, write the entire input once with the
//! terminal flush directive, close, return the bytes.

use bytes::Bytes;
use log::trace;

use crate::engine::Session;
use crate::modes::Mode;
use crate::options::ZlibOptions;
use crate::types::ZlibError;
use crate::utils::{compute_crc32, ZlibInput};

/// Run `mode` over the whole of `input`.
///
/// The single write uses the resolved `finish_flush` (default `Finish`).
/// The session is closed whether or not the write succeeds.
pub fn process_sync(
    mode: Mode,
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    let data = input.into().into_bytes()?;
    let params = options.cloned().unwrap_or_default().resolve(mode)?;

    let mut session = Session::open_with(&params)?;
    let result = session.write(&data, params.finish_flush);
    session.close();

    let out = result?;
    trace!("[ONESHOT] {} {} -> {} bytes", mode, data.len(), out.len());
    Ok(Bytes::from(out))
}

pub fn deflate_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::Deflate, input, options)
}

pub fn inflate_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::Inflate, input, options)
}

pub fn gzip_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::Gzip, input, options)
}

pub fn gunzip_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::Gunzip, input, options)
}

pub fn deflate_raw_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::DeflateRaw, input, options)
}

pub fn inflate_raw_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::InflateRaw, input, options)
}

/// Autodetects gzip or zlib framing.
pub fn unzip_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::Unzip, input, options)
}

pub fn brotli_compress_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::BrotliCompress, input, options)
}

pub fn brotli_decompress_sync(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> Result<Bytes, ZlibError> {
    process_sync(Mode::BrotliDecompress, input, options)
}

/// CRC-32 of `input` continuing from `start` (0 for a fresh checksum).
pub fn crc32(input: impl Into<ZlibInput>, start: u32) -> Result<u32, ZlibError> {
    let data = input.into().into_bytes()?;
    Ok(compute_crc32(&data, start))
}
