//! modes.rs
//! The nine mode specializations as data: ids, names, direction and the
//! option mapping each one applies before a session is opened.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::*;
use crate::options::ZlibOptions;
use crate::types::ZlibError;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum Mode {
    Deflate = mode_ids::DEFLATE,
    Inflate = mode_ids::INFLATE,
    Gzip = mode_ids::GZIP,
    Gunzip = mode_ids::GUNZIP,
    DeflateRaw = mode_ids::DEFLATE_RAW,
    InflateRaw = mode_ids::INFLATE_RAW,
    Unzip = mode_ids::UNZIP,
    BrotliCompress = mode_ids::BROTLI_COMPRESS,
    BrotliDecompress = mode_ids::BROTLI_DECOMPRESS,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Zlib,
    Brotli,
}

/// Level / window pair after a mode's option mapping. `None` falls back to
/// the mode default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelWindow {
    pub level: Option<i32>,
    pub window_bits: Option<i32>,
}

pub struct ModeProfile {
    pub mode: Mode,
    pub name: &'static str,
    pub family: Family,
    pub direction: Direction,
    pub default_level: i32,
    pub default_window_bits: i32,
    pub map_options: fn(&ZlibOptions) -> LevelWindow,
}

fn passthrough(opts: &ZlibOptions) -> LevelWindow {
    LevelWindow {
        level: opts.level,
        window_bits: opts.window_bits,
    }
}

/// Quality and lgwin come from `params`; an explicit level / windowBits wins.
/// `Z_DEFAULT_COMPRESSION` as a level means "no explicit quality".
fn brotli_encoder_options(opts: &ZlibOptions) -> LevelWindow {
    let level = opts
        .level
        .filter(|l| *l != Z_DEFAULT_COMPRESSION)
        .or_else(|| opts.params.get(&BROTLI_PARAM_QUALITY).map(|q| *q as i32));
    let window_bits = opts
        .window_bits
        .or_else(|| opts.params.get(&BROTLI_PARAM_LGWIN).map(|w| *w as i32));
    LevelWindow { level, window_bits }
}

const fn zlib_profile(mode: Mode, name: &'static str, direction: Direction) -> ModeProfile {
    ModeProfile {
        mode,
        name,
        family: Family::Zlib,
        direction,
        default_level: Z_DEFAULT_COMPRESSION,
        default_window_bits: Z_DEFAULT_WINDOWBITS,
        map_options: passthrough,
    }
}

static MODE_TABLE: [ModeProfile; 9] = [
    zlib_profile(Mode::Deflate, "Deflate", Direction::Compress),
    zlib_profile(Mode::Inflate, "Inflate", Direction::Decompress),
    zlib_profile(Mode::Gzip, "Gzip", Direction::Compress),
    zlib_profile(Mode::Gunzip, "Gunzip", Direction::Decompress),
    zlib_profile(Mode::DeflateRaw, "DeflateRaw", Direction::Compress),
    zlib_profile(Mode::InflateRaw, "InflateRaw", Direction::Decompress),
    zlib_profile(Mode::Unzip, "Unzip", Direction::Decompress),
    ModeProfile {
        mode: Mode::BrotliCompress,
        name: "BrotliCompress",
        family: Family::Brotli,
        direction: Direction::Compress,
        default_level: BROTLI_DEFAULT_QUALITY,
        default_window_bits: BROTLI_DEFAULT_WINDOW,
        map_options: brotli_encoder_options,
    },
    ModeProfile {
        mode: Mode::BrotliDecompress,
        name: "BrotliDecompress",
        family: Family::Brotli,
        direction: Direction::Decompress,
        default_level: BROTLI_DEFAULT_QUALITY,
        default_window_bits: BROTLI_DEFAULT_WINDOW,
        map_options: passthrough,
    },
];

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Deflate,
        Mode::Inflate,
        Mode::Gzip,
        Mode::Gunzip,
        Mode::DeflateRaw,
        Mode::InflateRaw,
        Mode::Unzip,
        Mode::BrotliCompress,
        Mode::BrotliDecompress,
    ];

    pub fn profile(self) -> &'static ModeProfile {
        &MODE_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn id(self) -> u8 {
        self.into()
    }

    /// Resolve a numeric mode id; unknown ids are an init failure.
    pub fn from_id(id: u8) -> Result<Self, ZlibError> {
        Mode::try_from_primitive(id)
            .map_err(|_| ZlibError::init("unknown", format!("invalid mode id {id}")))
    }

    pub fn is_brotli(self) -> bool {
        self.profile().family == Family::Brotli
    }

    pub fn is_compress(self) -> bool {
        self.profile().direction == Direction::Compress
    }

    /// Mode that undoes this one. `Unzip` autodetects its input and has no
    /// single compressing counterpart.
    pub fn inverse(self) -> Option<Mode> {
        match self {
            Mode::Deflate => Some(Mode::Inflate),
            Mode::Inflate => Some(Mode::Deflate),
            Mode::Gzip => Some(Mode::Gunzip),
            Mode::Gunzip => Some(Mode::Gzip),
            Mode::DeflateRaw => Some(Mode::InflateRaw),
            Mode::InflateRaw => Some(Mode::DeflateRaw),
            Mode::Unzip => None,
            Mode::BrotliCompress => Some(Mode::BrotliDecompress),
            Mode::BrotliDecompress => Some(Mode::BrotliCompress),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for mode in Mode::ALL {
            assert_eq!(mode.profile().mode, mode);
            assert_eq!(Mode::from_id(mode.id()).unwrap(), mode);
        }
    }

    #[test]
    fn brotli_level_overrides_params() {
        let opts = ZlibOptions::default()
            .with_param(BROTLI_PARAM_QUALITY, 4)
            .with_param(BROTLI_PARAM_LGWIN, 18)
            .with_level(7);
        let lw = (Mode::BrotliCompress.profile().map_options)(&opts);
        assert_eq!(lw.level, Some(7));
        assert_eq!(lw.window_bits, Some(18));
    }
}
