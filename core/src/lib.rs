//! zstream-core
//!
//! zlib-family and Brotli compression exposed as sessions, one-shot calls,
//! async completions and chunked streams.
//! Pure Rust engines (flate2 + brotli), no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod options;
pub mod modes;

// Engine adapter
pub mod engine;

// Facades
pub mod oneshot;
pub mod async_api;
pub mod transform;
pub mod stream;

pub mod telemetry;

pub use types::{Result, ZlibError};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::async_api::{OperationQueue, ZlibTask};
    pub use crate::engine::Session;
    pub use crate::modes::Mode;
    pub use crate::oneshot::*;
    pub use crate::options::{FlushMode, ZlibOptions};
    pub use crate::stream::{StreamEvent, ZlibStream};
    pub use crate::transform::ZlibTransform;
    pub use crate::types::ZlibError;
    pub use crate::utils::{Encoding, ZlibInput};
}
