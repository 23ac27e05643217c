//! constants.rs
//! Numeric constant table shared with callers written against the
//! conventional zlib / Brotli binding contract.
//!
//! Values are part of the public contract and must not change.

// ---- Compression levels ----
pub const Z_NO_COMPRESSION: i32 = 0;
pub const Z_BEST_SPEED: i32 = 1;
pub const Z_BEST_COMPRESSION: i32 = 9;
pub const Z_DEFAULT_COMPRESSION: i32 = -1;

// ---- Strategies ----
pub const Z_FILTERED: i32 = 1;
pub const Z_HUFFMAN_ONLY: i32 = 2;
pub const Z_RLE: i32 = 3;
pub const Z_FIXED: i32 = 4;
pub const Z_DEFAULT_STRATEGY: i32 = 0;

// ---- Data types ----
pub const Z_BINARY: i32 = 0;
pub const Z_TEXT: i32 = 1;
pub const Z_ASCII: i32 = 1;
pub const Z_UNKNOWN: i32 = 2;
pub const Z_DEFLATED: i32 = 8;

// ---- Flush directives ----
pub const Z_NO_FLUSH: i32 = 0;
pub const Z_PARTIAL_FLUSH: i32 = 1;
pub const Z_SYNC_FLUSH: i32 = 2;
pub const Z_FULL_FLUSH: i32 = 3;
pub const Z_FINISH: i32 = 4;
pub const Z_BLOCK: i32 = 5;
pub const Z_TREES: i32 = 6;

// ---- Error numbers (reported through `ZlibError::code`) ----
pub const Z_OK: i32 = 0;
pub const Z_STREAM_END: i32 = 1;
pub const Z_NEED_DICT: i32 = 2;
pub const Z_ERRNO: i32 = -1;
pub const Z_STREAM_ERROR: i32 = -2;
pub const Z_DATA_ERROR: i32 = -3;
pub const Z_MEM_ERROR: i32 = -4;
pub const Z_BUF_ERROR: i32 = -5;
pub const Z_VERSION_ERROR: i32 = -6;

// ---- Brotli directions ----
pub const BROTLI_ENCODE: i32 = 7;
pub const BROTLI_DECODE: i32 = 8;

/// Brotli parameter keys (used in `ZlibOptions::params`).
pub mod brotli_params {
    pub const BROTLI_PARAM_MODE: u32 = 0;
    pub const BROTLI_PARAM_QUALITY: u32 = 1;
    pub const BROTLI_PARAM_LGWIN: u32 = 2;
    pub const BROTLI_PARAM_LGBLOCK: u32 = 3;
    pub const BROTLI_PARAM_DISABLE_LITERAL_CONTEXT_MODELING: u32 = 4;
    pub const BROTLI_PARAM_SIZE_HINT: u32 = 5;
    pub const BROTLI_PARAM_LARGE_WINDOW: u32 = 6;
    pub const BROTLI_PARAM_NPOSTFIX: u32 = 7;
    pub const BROTLI_PARAM_NDIRECT: u32 = 8;
}
pub use brotli_params::*;

// ---- Brotli operations ----
pub const BROTLI_OPERATION_PROCESS: i32 = 0;
pub const BROTLI_OPERATION_FLUSH: i32 = 1;
pub const BROTLI_OPERATION_FINISH: i32 = 2;
pub const BROTLI_OPERATION_EMIT_METADATA: i32 = 3;

// ---- Brotli modes ----
pub const BROTLI_MODE_GENERIC: i32 = 0;
pub const BROTLI_MODE_TEXT: i32 = 1;
pub const BROTLI_MODE_FONT: i32 = 2;

// ---- Limits ----
pub const Z_MIN_WINDOWBITS: i32 = 8;
pub const Z_MAX_WINDOWBITS: i32 = 15;
pub const Z_DEFAULT_WINDOWBITS: i32 = 15;
pub const Z_MIN_CHUNK: usize = 64;
/// Unbounded; the table exports it as `f64::INFINITY`.
pub const Z_MAX_CHUNK: usize = usize::MAX;
pub const Z_DEFAULT_CHUNK: usize = 16 * 1024;
pub const Z_MIN_MEMLEVEL: i32 = 1;
pub const Z_MAX_MEMLEVEL: i32 = 9;
pub const Z_DEFAULT_MEMLEVEL: i32 = 8;
pub const Z_MIN_LEVEL: i32 = -1;
pub const Z_MAX_LEVEL: i32 = 9;

pub const BROTLI_MIN_QUALITY: i32 = 0;
pub const BROTLI_MAX_QUALITY: i32 = 11;
pub const BROTLI_DEFAULT_QUALITY: i32 = 11;
pub const BROTLI_MIN_WINDOW_BITS: i32 = 10;
pub const BROTLI_MAX_WINDOW_BITS: i32 = 24;
pub const BROTLI_DEFAULT_WINDOW: i32 = 22;

/// Stable numeric mode ids accepted by `create_stream`.
pub mod mode_ids {
    pub const DEFLATE: u8 = 0;
    pub const INFLATE: u8 = 1;
    pub const GZIP: u8 = 2;
    pub const GUNZIP: u8 = 3;
    pub const DEFLATE_RAW: u8 = 4;
    pub const INFLATE_RAW: u8 = 5;
    pub const UNZIP: u8 = 6;
    pub const BROTLI_COMPRESS: u8 = 7;
    pub const BROTLI_DECOMPRESS: u8 = 8;
}

/// Gzip member magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Named constant table, in the order callers enumerate it.
pub const CONSTANTS: &[(&str, f64)] = &[
    ("Z_NO_COMPRESSION", Z_NO_COMPRESSION as f64),
    ("Z_BEST_SPEED", Z_BEST_SPEED as f64),
    ("Z_BEST_COMPRESSION", Z_BEST_COMPRESSION as f64),
    ("Z_DEFAULT_COMPRESSION", Z_DEFAULT_COMPRESSION as f64),
    ("Z_FILTERED", Z_FILTERED as f64),
    ("Z_HUFFMAN_ONLY", Z_HUFFMAN_ONLY as f64),
    ("Z_RLE", Z_RLE as f64),
    ("Z_FIXED", Z_FIXED as f64),
    ("Z_DEFAULT_STRATEGY", Z_DEFAULT_STRATEGY as f64),
    ("Z_BINARY", Z_BINARY as f64),
    ("Z_TEXT", Z_TEXT as f64),
    ("Z_ASCII", Z_ASCII as f64),
    ("Z_UNKNOWN", Z_UNKNOWN as f64),
    ("Z_DEFLATED", Z_DEFLATED as f64),
    ("Z_NO_FLUSH", Z_NO_FLUSH as f64),
    ("Z_PARTIAL_FLUSH", Z_PARTIAL_FLUSH as f64),
    ("Z_SYNC_FLUSH", Z_SYNC_FLUSH as f64),
    ("Z_FULL_FLUSH", Z_FULL_FLUSH as f64),
    ("Z_FINISH", Z_FINISH as f64),
    ("Z_BLOCK", Z_BLOCK as f64),
    ("Z_TREES", Z_TREES as f64),
    ("BROTLI_DECODE", BROTLI_DECODE as f64),
    ("BROTLI_ENCODE", BROTLI_ENCODE as f64),
    ("BROTLI_PARAM_MODE", BROTLI_PARAM_MODE as f64),
    ("BROTLI_PARAM_QUALITY", BROTLI_PARAM_QUALITY as f64),
    ("BROTLI_PARAM_LGWIN", BROTLI_PARAM_LGWIN as f64),
    ("BROTLI_PARAM_LGBLOCK", BROTLI_PARAM_LGBLOCK as f64),
    (
        "BROTLI_PARAM_DISABLE_LITERAL_CONTEXT_MODELING",
        BROTLI_PARAM_DISABLE_LITERAL_CONTEXT_MODELING as f64,
    ),
    ("BROTLI_PARAM_SIZE_HINT", BROTLI_PARAM_SIZE_HINT as f64),
    ("BROTLI_PARAM_LARGE_WINDOW", BROTLI_PARAM_LARGE_WINDOW as f64),
    ("BROTLI_PARAM_NPOSTFIX", BROTLI_PARAM_NPOSTFIX as f64),
    ("BROTLI_PARAM_NDIRECT", BROTLI_PARAM_NDIRECT as f64),
    ("BROTLI_OPERATION_PROCESS", BROTLI_OPERATION_PROCESS as f64),
    ("BROTLI_OPERATION_FLUSH", BROTLI_OPERATION_FLUSH as f64),
    ("BROTLI_OPERATION_FINISH", BROTLI_OPERATION_FINISH as f64),
    ("BROTLI_OPERATION_EMIT_METADATA", BROTLI_OPERATION_EMIT_METADATA as f64),
    ("BROTLI_MODE_GENERIC", BROTLI_MODE_GENERIC as f64),
    ("BROTLI_MODE_TEXT", BROTLI_MODE_TEXT as f64),
    ("BROTLI_MODE_FONT", BROTLI_MODE_FONT as f64),
    ("Z_MIN_WINDOWBITS", Z_MIN_WINDOWBITS as f64),
    ("Z_MAX_WINDOWBITS", Z_MAX_WINDOWBITS as f64),
    ("Z_MIN_CHUNK", Z_MIN_CHUNK as f64),
    ("Z_MAX_CHUNK", f64::INFINITY),
    ("Z_DEFAULT_CHUNK", Z_DEFAULT_CHUNK as f64),
    ("Z_MIN_MEMLEVEL", Z_MIN_MEMLEVEL as f64),
    ("Z_MAX_MEMLEVEL", Z_MAX_MEMLEVEL as f64),
    ("Z_DEFAULT_MEMLEVEL", Z_DEFAULT_MEMLEVEL as f64),
    ("Z_MIN_LEVEL", Z_MIN_LEVEL as f64),
    ("Z_MAX_LEVEL", Z_MAX_LEVEL as f64),
];

/// Look up a named constant from the table.
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}
