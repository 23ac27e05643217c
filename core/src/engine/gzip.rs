//! engine/gzip.rs
//! Gzip member framing around raw deflate: header + body + CRC32/ISIZE
//! trailer on encode, an incremental header/body/trailer parser on decode.

use byteorder::{ByteOrder, LittleEndian};
use crc32fast::Hasher;
use flate2::{Compress, Decompress};
use log::{debug, warn};

use crate::constants::{GZIP_MAGIC, Z_BEST_COMPRESSION, Z_BEST_SPEED, Z_DEFLATED};
use crate::engine::deflate::{compression_level, note_unwired, run_compress, run_decompress};
use crate::engine::{output_step, CodecEngine};
use crate::modes::Mode;
use crate::options::{FlushMode, ResolvedOptions};
use crate::types::ZlibError;

pub const GZIP_HEADER_LEN: usize = 10;
pub const GZIP_TRAILER_LEN: usize = 8;
const OS_UNKNOWN: u8 = 0xff;

const FTEXT: u8 = 0x01;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xe0;

/// Minimal member header: no name, no mtime.
pub fn gzip_header(level: i32) -> [u8; GZIP_HEADER_LEN] {
    let xfl = match level {
        Z_BEST_COMPRESSION => 2,
        Z_BEST_SPEED => 4,
        _ => 0,
    };
    [
        GZIP_MAGIC[0],
        GZIP_MAGIC[1],
        Z_DEFLATED as u8,
        0,
        0,
        0,
        0,
        0,
        xfl,
        OS_UNKNOWN,
    ]
}

/// Length of a complete member header at the start of `buf`, `None` while
/// more bytes are needed.
pub fn parse_gzip_header(buf: &[u8]) -> Result<Option<usize>, String> {
    if buf.first().is_some_and(|b| *b != GZIP_MAGIC[0])
        || buf.get(1).is_some_and(|b| *b != GZIP_MAGIC[1])
    {
        return Err("incorrect header check".into());
    }
    if buf.get(2).is_some_and(|b| *b != Z_DEFLATED as u8) {
        return Err("unknown compression method".into());
    }
    if buf.len() < GZIP_HEADER_LEN {
        return Ok(None);
    }

    let flags = buf[3];
    if flags & FRESERVED != 0 {
        return Err("unknown header flags set".into());
    }
    if flags & FTEXT != 0 {
        debug!("[GZIP] FTEXT set; treated as binary");
    }

    let mut pos = GZIP_HEADER_LEN;
    if flags & FEXTRA != 0 {
        if buf.len() < pos + 2 {
            return Ok(None);
        }
        let xlen = LittleEndian::read_u16(&buf[pos..pos + 2]) as usize;
        pos += 2 + xlen;
        if buf.len() < pos {
            return Ok(None);
        }
    }
    for flag in [FNAME, FCOMMENT] {
        if flags & flag != 0 {
            match buf[pos..].iter().position(|b| *b == 0) {
                Some(nul) => pos += nul + 1,
                None => return Ok(None),
            }
        }
    }
    if flags & FHCRC != 0 {
        if buf.len() < pos + 2 {
            return Ok(None);
        }
        let expected = LittleEndian::read_u16(&buf[pos..pos + 2]);
        let actual = (crc32fast::hash(&buf[..pos]) & 0xffff) as u16;
        if expected != actual {
            return Err("header crc mismatch".into());
        }
        pos += 2;
    }
    Ok(Some(pos))
}

pub struct GzipEngine {
    mode: Mode,
    level: i32,
    deflate: Compress,
    crc: Hasher,
    isize: u32,
    chunk_size: usize,
    header_written: bool,
    finished: bool,
}

impl GzipEngine {
    pub fn new(params: &ResolvedOptions) -> Self {
        note_unwired(params);
        Self {
            mode: params.mode,
            level: params.level,
            deflate: Compress::new(compression_level(params.level), false),
            crc: Hasher::new(),
            isize: 0,
            chunk_size: output_step(params.chunk_size),
            header_written: false,
            finished: false,
        }
    }
}

impl CodecEngine for GzipEngine {
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
        if !self.header_written {
            out.extend_from_slice(&gzip_header(self.level));
            self.header_written = true;
        }

        self.crc.update(input);
        self.isize = self.isize.wrapping_add(input.len() as u32);

        let ended = run_compress(&mut self.deflate, input, flush, self.chunk_size, out)
            .map_err(|m| ZlibError::data(self.mode.name(), m))?;
        if ended {
            let mut trailer = [0u8; GZIP_TRAILER_LEN];
            LittleEndian::write_u32(&mut trailer[..4], self.crc.clone().finalize());
            LittleEndian::write_u32(&mut trailer[4..], self.isize);
            out.extend_from_slice(&trailer);
            self.finished = true;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberState {
    Header,
    Body,
    Trailer,
    /// Between members: either another magic follows or the input is done.
    Boundary,
    /// Non-gzip bytes after the last member.
    Garbage,
}

/// Decodes one or more concatenated gzip members.
pub struct GunzipEngine {
    mode: Mode,
    inflate: Decompress,
    crc: Hasher,
    isize: u32,
    state: MemberState,
    pending: Vec<u8>,
    members: usize,
    chunk_size: usize,
}

impl GunzipEngine {
    pub fn new(params: &ResolvedOptions) -> Self {
        Self::for_mode(params.mode, params)
    }

    pub(crate) fn for_mode(mode: Mode, params: &ResolvedOptions) -> Self {
        Self {
            mode,
            inflate: Decompress::new(false),
            crc: Hasher::new(),
            isize: 0,
            state: MemberState::Header,
            pending: Vec::with_capacity(GZIP_HEADER_LEN),
            members: 0,
            chunk_size: output_step(params.chunk_size),
        }
    }

    fn data_err(&self, msg: impl Into<String>) -> ZlibError {
        ZlibError::data(self.mode.name(), msg)
    }

    fn begin_member(&mut self) {
        self.inflate.reset(false);
        self.crc = Hasher::new();
        self.isize = 0;
    }

    fn check_trailer(&self) -> Result<(), ZlibError> {
        let expected_crc = LittleEndian::read_u32(&self.pending[..4]);
        let expected_len = LittleEndian::read_u32(&self.pending[4..8]);
        if expected_crc != self.crc.clone().finalize() {
            return Err(self.data_err("incorrect data check"));
        }
        if expected_len != self.isize {
            return Err(self.data_err("incorrect length check"));
        }
        Ok(())
    }
}

impl CodecEngine for GunzipEngine {
    fn write(
        &mut self,
        input: &[u8],
        flush: FlushMode,
        out: &mut Vec<u8>,
    ) -> Result<(), ZlibError> {
        let mut pos = 0usize;

        loop {
            let rest = &input[pos..];
            match self.state {
                MemberState::Header => {
                    self.pending.extend_from_slice(rest);
                    pos = input.len();
                    match parse_gzip_header(&self.pending).map_err(|m| self.data_err(m))? {
                        None => break,
                        Some(header_len) => {
                            // Bytes past the header arrived in this write; hand them back.
                            pos -= self.pending.len() - header_len;
                            self.pending.clear();
                            self.state = MemberState::Body;
                        }
                    }
                }
                MemberState::Body => {
                    let start = out.len();
                    let (ended, used) =
                        run_decompress(&mut self.inflate, rest, flush, self.chunk_size, out)
                            .map_err(|m| self.data_err(m))?;
                    self.crc.update(&out[start..]);
                    self.isize = self.isize.wrapping_add((out.len() - start) as u32);
                    pos += used;
                    if !ended {
                        break;
                    }
                    self.state = MemberState::Trailer;
                }
                MemberState::Trailer => {
                    let take = (GZIP_TRAILER_LEN - self.pending.len()).min(rest.len());
                    self.pending.extend_from_slice(&rest[..take]);
                    pos += take;
                    if self.pending.len() < GZIP_TRAILER_LEN {
                        break;
                    }
                    self.check_trailer()?;
                    self.pending.clear();
                    self.members += 1;
                    debug!("[GZIP] member {} verified", self.members);
                    self.state = MemberState::Boundary;
                }
                MemberState::Boundary => {
                    if rest.is_empty() {
                        break;
                    }
                    let take = (GZIP_MAGIC.len() - self.pending.len()).min(rest.len());
                    self.pending.extend_from_slice(&rest[..take]);
                    pos += take;
                    if self.pending[0] != GZIP_MAGIC[0] {
                        self.state = MemberState::Garbage;
                    } else if self.pending.len() == GZIP_MAGIC.len() {
                        if self.pending[..] == GZIP_MAGIC {
                            self.begin_member();
                            self.state = MemberState::Header;
                        } else {
                            self.state = MemberState::Garbage;
                        }
                    }
                }
                MemberState::Garbage => {
                    if !rest.is_empty() || !self.pending.is_empty() {
                        warn!(
                            "[GZIP] {} bytes of trailing garbage after member {} ignored",
                            rest.len() + self.pending.len(),
                            self.members
                        );
                        self.pending.clear();
                    }
                    pos = input.len();
                    break;
                }
            }
        }

        if flush == FlushMode::Finish
            && !matches!(self.state, MemberState::Boundary | MemberState::Garbage)
        {
            return Err(self.data_err("unexpected end of file"));
        }
        debug_assert!(pos <= input.len());
        Ok(())
    }
}
