//! options.rs
//! Caller-facing options, their serde form and per-mode resolution.
//!
//! `ZlibOptions` mirrors the conventional options object (camelCase keys,
//! every field optional). `resolve` applies the mode's mapping and defaults
//! and validates everything that is not engine specific.

use std::collections::BTreeMap;

use bytes::Bytes;
use log::warn;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::modes::Mode;
use crate::types::ZlibError;

#[repr(i32)]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub enum FlushMode {
    NoFlush = Z_NO_FLUSH,
    PartialFlush = Z_PARTIAL_FLUSH,
    SyncFlush = Z_SYNC_FLUSH,
    FullFlush = Z_FULL_FLUSH,
    Finish = Z_FINISH,
    Block = Z_BLOCK,
    Trees = Z_TREES,
}

impl FlushMode {
    pub fn from_code(code: i32) -> Result<Self, ZlibError> {
        FlushMode::try_from_primitive(code)
            .map_err(|_| ZlibError::Config(format!("invalid flush directive {code}")))
    }
}

#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Strategy {
    Default = Z_DEFAULT_STRATEGY,
    Filtered = Z_FILTERED,
    HuffmanOnly = Z_HUFFMAN_ONLY,
    Rle = Z_RLE,
    Fixed = Z_FIXED,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZlibOptions {
    pub level: Option<i32>,
    pub window_bits: Option<i32>,
    pub mem_level: Option<i32>,
    pub strategy: Option<i32>,
    pub dictionary: Option<Vec<u8>>,
    /// Brotli parameter map keyed by `BROTLI_PARAM_*`.
    pub params: BTreeMap<u32, u32>,
    pub flush: Option<FlushMode>,
    pub finish_flush: Option<FlushMode>,
    pub chunk_size: Option<usize>,
}

impl ZlibOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(doc: &str) -> Result<Self, ZlibError> {
        Ok(serde_json::from_str(doc)?)
    }

    pub fn to_json(&self) -> Result<String, ZlibError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_window_bits(mut self, window_bits: i32) -> Self {
        self.window_bits = Some(window_bits);
        self
    }

    pub fn with_mem_level(mut self, mem_level: i32) -> Self {
        self.mem_level = Some(mem_level);
        self
    }

    pub fn with_strategy(mut self, strategy: i32) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_dictionary(mut self, dictionary: impl Into<Vec<u8>>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }

    pub fn with_param(mut self, key: u32, value: u32) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_flush(mut self, flush: FlushMode) -> Self {
        self.flush = Some(flush);
        self
    }

    pub fn with_finish_flush(mut self, finish_flush: FlushMode) -> Self {
        self.finish_flush = Some(finish_flush);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Apply `mode`'s option mapping and defaults.
    ///
    /// Level and window ranges are engine constraints and are checked when
    /// the session opens; everything else is checked here.
    pub fn resolve(&self, mode: Mode) -> Result<ResolvedOptions, ZlibError> {
        let profile = mode.profile();
        let mapped = (profile.map_options)(self);

        let mem_level = self.mem_level.unwrap_or(Z_DEFAULT_MEMLEVEL);
        if !(Z_MIN_MEMLEVEL..=Z_MAX_MEMLEVEL).contains(&mem_level) {
            return Err(ZlibError::init(
                profile.name,
                format!("invalid memLevel {mem_level}"),
            ));
        }

        let raw_strategy = self.strategy.unwrap_or(Z_DEFAULT_STRATEGY);
        let strategy = Strategy::try_from_primitive(raw_strategy).map_err(|_| {
            ZlibError::init(profile.name, format!("invalid strategy {raw_strategy}"))
        })?;

        let chunk_size = self.chunk_size.unwrap_or(Z_DEFAULT_CHUNK);
        if chunk_size < Z_MIN_CHUNK {
            return Err(ZlibError::init(
                profile.name,
                format!("invalid chunkSize {chunk_size}"),
            ));
        }

        if mode.is_brotli() {
            check_brotli_params(mode, &self.params)?;
        } else if !self.params.is_empty() {
            warn!("[OPTIONS] {}: brotli params ignored for zlib-family mode", profile.name);
        }

        Ok(ResolvedOptions {
            mode,
            level: mapped.level.unwrap_or(profile.default_level),
            window_bits: mapped.window_bits.unwrap_or(profile.default_window_bits),
            mem_level,
            strategy,
            dictionary: self.dictionary.as_ref().map(|d| Bytes::copy_from_slice(d)),
            params: self.params.clone(),
            flush: self.flush.unwrap_or(FlushMode::NoFlush),
            finish_flush: self.finish_flush.unwrap_or(FlushMode::Finish),
            chunk_size,
        })
    }
}

fn check_brotli_params(mode: Mode, params: &BTreeMap<u32, u32>) -> Result<(), ZlibError> {
    for (&key, &value) in params {
        let ok = match key {
            BROTLI_PARAM_MODE => value <= BROTLI_MODE_FONT as u32,
            BROTLI_PARAM_LGBLOCK => value == 0 || (16..=24).contains(&value),
            BROTLI_PARAM_QUALITY | BROTLI_PARAM_LGWIN => true,
            BROTLI_PARAM_DISABLE_LITERAL_CONTEXT_MODELING
            | BROTLI_PARAM_SIZE_HINT
            | BROTLI_PARAM_LARGE_WINDOW
            | BROTLI_PARAM_NPOSTFIX
            | BROTLI_PARAM_NDIRECT => true,
            _ => false,
        };
        if !ok {
            return Err(ZlibError::init(
                mode.name(),
                format!("invalid brotli parameter {key}={value}"),
            ));
        }
    }
    Ok(())
}

/// Options after mode mapping and defaulting. This is what sessions consume.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub mode: Mode,
    pub level: i32,
    pub window_bits: i32,
    pub mem_level: i32,
    pub strategy: Strategy,
    pub dictionary: Option<Bytes>,
    pub params: BTreeMap<u32, u32>,
    pub flush: FlushMode,
    pub finish_flush: FlushMode,
    pub chunk_size: usize,
}

impl ResolvedOptions {
    /// Defaults for `mode` with an explicit level / window pair.
    pub fn for_mode(mode: Mode, level: i32, window_bits: i32) -> Result<Self, ZlibError> {
        ZlibOptions::default()
            .with_level(level)
            .with_window_bits(window_bits)
            .resolve(mode)
    }
}
