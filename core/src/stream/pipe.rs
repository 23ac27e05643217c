//! stream/pipe.rs
//! Pull-based helpers that drive a transform from a reader.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;

use crate::constants::Z_MIN_CHUNK;
use crate::transform::ZlibTransform;
use crate::types::ZlibError;

/// Read `r` in `chunk_size` blocks and yield the transform's non-empty
/// outputs, ending with the terminal write's output.
pub fn pipe_reader<R: Read>(
    mut r: R,
    chunk_size: usize,
    mut transform: ZlibTransform,
) -> impl Iterator<Item = Result<Bytes, ZlibError>> {
    let mut buf = vec![0u8; chunk_size.max(Z_MIN_CHUNK)];
    let mut done = false;

    std::iter::from_fn(move || loop {
        if done {
            return None;
        }
        match r.read(&mut buf) {
            Ok(0) => {
                done = true;
                return match transform.finish() {
                    Ok(out) if out.is_empty() => None,
                    Ok(out) => Some(Ok(out)),
                    Err(e) => Some(Err(e)),
                };
            }
            Ok(n) => match transform.transform(&buf[..n]) {
                Ok(out) if out.is_empty() => continue,
                Ok(out) => return Some(Ok(out)),
                Err(e) => {
                    done = true;
                    return Some(Err(e));
                }
            },
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                done = true;
                transform.close();
                return Some(Err(ZlibError::from(e)));
            }
        }
    })
}

/// Copy `reader` through `transform` into `writer`. Returns bytes written.
pub fn pipe<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    transform: ZlibTransform,
) -> Result<u64, ZlibError> {
    let chunk_size = transform.chunk_size();
    let mut total = 0u64;
    for chunk in pipe_reader(reader, chunk_size, transform) {
        let chunk = chunk?;
        writer.write_all(&chunk)?;
        total += chunk.len() as u64;
    }
    writer.flush()?;
    Ok(total)
}
