//! types.rs
//! Error taxonomy shared by every layer of the crate.

use std::io;
use thiserror::Error;

use crate::constants::{Z_DATA_ERROR, Z_STREAM_ERROR};

/// Unified error for sessions, one-shot calls, async completions and streams.
/// - Engine failures carry the mode name they were raised in.
/// - Messages aim to be stable for logs and boundary mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZlibError {
    /// Invalid mode / level / window / option combination at session open.
    #[error("engine init failed for {mode}: {msg}")]
    EngineInit { mode: &'static str, msg: String },

    /// Malformed or corrupt input detected by the codec engine.
    #[error("engine data error in {mode}: {msg}")]
    EngineData { mode: &'static str, msg: String },

    /// A caller value could not be converted to bytes.
    #[error("invalid input type: {0}")]
    InvalidInputType(String),

    /// Async entry point invoked without a completion callback.
    #[error("callback contract violated: {0}")]
    CallbackContract(String),

    /// Options document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Stream or session used outside its lifecycle (write after end, closed session).
    #[error("stream state error: {0}")]
    State(String),
}

pub type Result<T, E = ZlibError> = std::result::Result<T, E>;

impl ZlibError {
    pub fn init(mode: &'static str, msg: impl Into<String>) -> Self {
        ZlibError::EngineInit { mode, msg: msg.into() }
    }

    pub fn data(mode: &'static str, msg: impl Into<String>) -> Self {
        ZlibError::EngineData { mode, msg: msg.into() }
    }

    /// Conventional zlib error number, where one applies.
    pub fn code(&self) -> Option<i32> {
        match self {
            ZlibError::EngineInit { .. } => Some(Z_STREAM_ERROR),
            ZlibError::EngineData { .. } => Some(Z_DATA_ERROR),
            _ => None,
        }
    }

    /// Taxonomy name surfaced at dynamic boundaries.
    pub fn kind_name(&self) -> &'static str {
        use ZlibError::*;
        match self {
            EngineInit { .. } => "EngineInitError",
            EngineData { .. } => "EngineDataError",
            InvalidInputType(_) => "InvalidInputTypeError",
            CallbackContract(_) => "CallbackContractError",
            Config(_) => "ConfigError",
            State(_) => "StateError",
        }
    }

    pub fn is_engine_data(&self) -> bool {
        matches!(self, ZlibError::EngineData { .. })
    }

    pub fn is_engine_init(&self) -> bool {
        matches!(self, ZlibError::EngineInit { .. })
    }
}

impl From<io::Error> for ZlibError {
    fn from(e: io::Error) -> Self {
        ZlibError::State(e.to_string())
    }
}

impl From<serde_json::Error> for ZlibError {
    fn from(e: serde_json::Error) -> Self {
        ZlibError::Config(e.to_string())
    }
}
