#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;
    use zstream_core::modes::Mode;
    use zstream_core::oneshot::*;
    use zstream_core::options::{FlushMode, ZlibOptions};
    use zstream_core::stream::{pipe, pipe_reader};
    use zstream_core::transform::{TransformState, ZlibTransform};
    use zstream_core::ZlibError;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn payload() -> Vec<u8> {
        b"streaming transform payload with some repetition. ".repeat(300)
    }

    fn run_chunked(mode: Mode, data: &[u8], chunk: usize) -> Vec<u8> {
        let mut t = ZlibTransform::new(mode, &ZlibOptions::default()).unwrap();
        let mut out = BytesMut::new();
        for c in data.chunks(chunk) {
            out.extend_from_slice(&t.transform(c).unwrap());
        }
        out.extend_from_slice(&t.finish().unwrap());
        out.to_vec()
    }

    #[test]
    fn chunked_output_matches_one_shot() {
        init_logger();
        let data = payload();
        for mode in [Mode::Deflate, Mode::Gzip, Mode::DeflateRaw, Mode::BrotliCompress] {
            let one_shot = process_sync(mode, data.as_slice(), None).unwrap();
            for chunk in [1, 7, 64, 1000, data.len()] {
                assert_eq!(run_chunked(mode, &data, chunk), one_shot, "{mode} chunk={chunk}");
            }
        }
    }

    #[test]
    fn chunked_brotli_matches_one_shot_and_roundtrips() {
        let data = payload();
        let one_shot = brotli_compress_sync(data.as_slice(), None).unwrap();
        for chunk in [1, 3, 500, 4096, data.len()] {
            let packed = run_chunked(Mode::BrotliCompress, &data, chunk);
            assert_eq!(packed, one_shot, "chunk={chunk}");
            assert_eq!(brotli_decompress_sync(packed, None).unwrap(), data);
        }
    }

    #[test]
    fn chunked_decompression_matches_one_shot() {
        let data = payload();
        let cases = [
            (Mode::Inflate, deflate_sync(data.as_slice(), None).unwrap()),
            (Mode::Gunzip, gzip_sync(data.as_slice(), None).unwrap()),
            (Mode::InflateRaw, deflate_raw_sync(data.as_slice(), None).unwrap()),
            (Mode::Unzip, gzip_sync(data.as_slice(), None).unwrap()),
            (Mode::Unzip, deflate_sync(data.as_slice(), None).unwrap()),
            (Mode::BrotliDecompress, brotli_compress_sync(data.as_slice(), None).unwrap()),
        ];
        for (mode, packed) in cases {
            for chunk in [1, 5, 333] {
                assert_eq!(run_chunked(mode, &packed, chunk), data, "{mode} chunk={chunk}");
            }
        }
    }

    #[test]
    fn terminal_write_runs_with_zero_chunks() {
        let mut gz = ZlibTransform::new(Mode::Gzip, &ZlibOptions::default()).unwrap();
        let out = gz.finish().unwrap();
        assert_eq!(&out[..2], &[0x1f, 0x8b]);
        assert!(gunzip_sync(out, None).unwrap().is_empty());

        let mut br = ZlibTransform::new(Mode::BrotliCompress, &ZlibOptions::default()).unwrap();
        let out = br.finish().unwrap();
        assert!(!out.is_empty());
        assert!(brotli_decompress_sync(out, None).unwrap().is_empty());
    }

    #[test]
    fn lifecycle_states_and_write_after_end() {
        let mut t = ZlibTransform::new(Mode::Deflate, &ZlibOptions::default()).unwrap();
        assert_eq!(t.state(), TransformState::Open);
        t.transform(b"abc").unwrap();
        assert_eq!(t.state(), TransformState::Writing);
        t.finish().unwrap();
        assert_eq!(t.state(), TransformState::Closed);
        assert!(t.is_ended());

        assert!(matches!(t.transform(b"late"), Err(ZlibError::State(_))));
        assert!(matches!(t.finish(), Err(ZlibError::State(_))));
        assert!(t.flush(FlushMode::FullFlush).unwrap().is_empty());

        t.close();
        t.close();
        assert_eq!(t.state(), TransformState::Closed);
    }

    #[test]
    fn write_state_follows_options() {
        let opts = ZlibOptions::new()
            .with_flush(FlushMode::SyncFlush)
            .with_finish_flush(FlushMode::Finish);
        let mut t = ZlibTransform::new(Mode::DeflateRaw, &opts).unwrap();
        assert_eq!(t.write_state().flush, FlushMode::SyncFlush);

        let out = t.transform(b"every chunk is flushed").unwrap();
        assert!(out.ends_with(&[0x00, 0x00, 0xff, 0xff]));
        assert_eq!(
            inflate_raw_sync(out, Some(&ZlibOptions::new().with_finish_flush(FlushMode::SyncFlush)))
                .unwrap(),
            "every chunk is flushed"
        );
    }

    #[test]
    fn explicit_flush_mid_stream() {
        let mut t = ZlibTransform::new(Mode::Deflate, &ZlibOptions::default()).unwrap();
        let mut out = t.transform(b"before flush ").unwrap().to_vec();
        let flushed = t.flush(FlushMode::SyncFlush).unwrap();
        assert!(flushed.ends_with(&[0x00, 0x00, 0xff, 0xff]));
        out.extend_from_slice(&flushed);
        out.extend_from_slice(&t.transform(b"after flush").unwrap());
        out.extend_from_slice(&t.finish().unwrap());

        assert_eq!(inflate_sync(out, None).unwrap(), "before flush after flush");
        assert_eq!(t.counters().flushes, 1);
    }

    #[test]
    fn engine_error_is_terminal() {
        let mut t = ZlibTransform::new(Mode::Inflate, &ZlibOptions::default()).unwrap();
        let err = t.transform(b"garbage that is not zlib").unwrap_err();
        assert!(err.is_engine_data());
        assert!(t.has_error());
        assert_eq!(t.state(), TransformState::Closed);
        assert!(matches!(t.transform(b"more"), Err(ZlibError::State(_))));
        assert!(matches!(t.finish(), Err(ZlibError::State(_))));
    }

    #[test]
    fn counters_track_bytes() {
        let data = payload();
        let mut t = ZlibTransform::new(Mode::Gzip, &ZlibOptions::default()).unwrap();
        let mut produced = 0usize;
        for c in data.chunks(1024) {
            produced += t.transform(c).unwrap().len();
        }
        produced += t.finish().unwrap().len();

        let counters = t.counters();
        assert_eq!(t.bytes_written(), data.len() as u64);
        assert_eq!(counters.chunks_in, data.chunks(1024).count() as u64);
        assert_eq!(counters.bytes_out, produced as u64);
        assert_eq!(counters.finishes, 1);

        let snap = t.snapshot();
        assert_eq!(snap.mode, "Gzip");
        assert!(snap.ratio > 0.0 && snap.ratio < 1.0);
        assert!(snap.to_json().unwrap().contains("\"bytes_in\""));
    }

    #[test]
    fn pipe_reader_yields_terminal_output_once() {
        let data = payload();
        let t = ZlibTransform::new(Mode::Gzip, &ZlibOptions::default()).unwrap();
        let chunks: Vec<_> = pipe_reader(Cursor::new(data.clone()), 64, t)
            .collect::<Result<_, _>>()
            .unwrap();
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(gunzip_sync(joined, None).unwrap(), data);
    }

    #[test]
    fn pipe_copies_through_transform() {
        let data = payload();
        let packed = brotli_compress_sync(data.as_slice(), None).unwrap();
        let t = ZlibTransform::new(Mode::BrotliDecompress, &ZlibOptions::default()).unwrap();
        let mut sink = Vec::new();
        let n = pipe(Cursor::new(packed), &mut sink, t).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(sink, data);
    }

    #[test]
    fn pipe_reader_reports_corrupt_input() {
        let t = ZlibTransform::new(Mode::Gunzip, &ZlibOptions::default()).unwrap();
        let results: Vec<_> = pipe_reader(Cursor::new(b"not gzip".to_vec()), 64, t).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap_err().is_engine_data());
    }
}
