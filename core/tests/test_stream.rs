#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use bytes::BytesMut;
    use zstream_core::modes::Mode;
    use zstream_core::oneshot::*;
    use zstream_core::options::{FlushMode, ZlibOptions};
    use zstream_core::stream::*;
    use zstream_core::ZlibError;

    const WAIT: Duration = Duration::from_secs(5);

    fn payload() -> Vec<u8> {
        b"queued stream chunk ".repeat(500)
    }

    #[test]
    fn gzip_stream_roundtrip() {
        let data = payload();
        let s = create_gzip(None).unwrap();
        for chunk in data.chunks(777) {
            s.write(chunk.to_vec()).unwrap();
        }
        s.end().unwrap();
        let packed = s.read_to_end().unwrap();
        assert_eq!(packed, gzip_sync(data.as_slice(), None).unwrap());
        assert_eq!(s.bytes_written(), data.len() as u64);

        let d = create_gunzip(None).unwrap();
        d.write(packed).unwrap();
        d.end().unwrap();
        assert_eq!(d.read_to_end().unwrap(), data);
    }

    #[test]
    fn brotli_stream_roundtrip() {
        let data = payload();
        let s = create_brotli_compress(Some(&ZlibOptions::new().with_level(4))).unwrap();
        s.write_input("prefix:").unwrap();
        s.write(data.clone()).unwrap();
        s.end().unwrap();
        let packed = s.read_to_end().unwrap();

        let mut expected = b"prefix:".to_vec();
        expected.extend_from_slice(&data);
        assert_eq!(brotli_decompress_sync(packed, None).unwrap(), expected);
    }

    #[test]
    fn end_without_writes_still_emits_container() {
        let s = create_deflate(None).unwrap();
        s.end().unwrap();
        let packed = s.read_to_end().unwrap();
        assert!(!packed.is_empty());
        assert!(inflate_sync(packed, None).unwrap().is_empty());
    }

    #[test]
    fn flush_is_ordered_behind_prior_writes() {
        let s = create_deflate(None).unwrap();
        let (tx, rx) = mpsc::channel();
        s.write(b"first part".to_vec()).unwrap();
        s.flush(Some(FlushMode::SyncFlush), Some(Box::new(move || {
            let _ = tx.send(());
        })))
        .unwrap();
        rx.recv_timeout(WAIT).unwrap();

        let mut flushed = BytesMut::new();
        while let Some(StreamEvent::Data(chunk)) = s.try_recv() {
            flushed.extend_from_slice(&chunk);
        }
        assert!(flushed.ends_with(&[0x00, 0x00, 0xff, 0xff]));
        let opts = ZlibOptions::new().with_finish_flush(FlushMode::SyncFlush);
        assert_eq!(inflate_sync(flushed.freeze(), Some(&opts)).unwrap(), "first part");
    }

    #[test]
    fn flush_after_end_is_deferred_not_written() {
        let s = create_deflate(None).unwrap();
        s.write(b"data".to_vec()).unwrap();
        s.end().unwrap();
        let packed = s.read_to_end().unwrap();

        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();
        s.flush(None, Some(Box::new(move || {
            let _ = tx.send(thread::current().id());
        })))
        .unwrap();
        let ran_on = rx.recv_timeout(WAIT).unwrap();
        assert_ne!(ran_on, caller);
        assert!(s.try_recv().is_none());
        assert_eq!(inflate_sync(packed, None).unwrap(), "data");
    }

    #[test]
    fn close_signals_every_time() {
        let mut s = create_inflate_raw(None).unwrap();
        s.close(None);
        s.close(None);
        assert!(s.is_closed());
        assert_eq!(s.recv_timeout(WAIT), Some(StreamEvent::Close));
        assert_eq!(s.recv_timeout(WAIT), Some(StreamEvent::Close));
        assert!(matches!(s.write(b"x".to_vec()), Err(ZlibError::State(_))));
    }

    #[test]
    fn close_callback_runs_later() {
        let mut s = create_unzip(None).unwrap();
        let (tx, rx) = mpsc::channel();
        s.close(Some(Box::new(move || {
            let _ = tx.send(());
        })));
        assert!(rx.recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn write_after_end_is_rejected() {
        let s = create_deflate_raw(None).unwrap();
        s.end().unwrap();
        s.end().unwrap();
        assert!(matches!(s.write(b"late".to_vec()), Err(ZlibError::State(_))));
    }

    #[test]
    fn corrupt_input_surfaces_error_event() {
        let s = create_inflate(None).unwrap();
        s.write(b"this is not a zlib stream".to_vec()).unwrap();
        s.end().unwrap_or(());
        let err = s.read_to_end().unwrap_err();
        assert!(err.is_engine_data());
        assert!(s.has_error());
        assert!(matches!(s.write(b"more".to_vec()), Err(ZlibError::State(_))));
    }

    #[test]
    fn dynamic_create_stream() {
        let s = create_stream(Mode::Gzip.id(), 9, 15).unwrap();
        assert_eq!(s.mode(), Mode::Gzip);
        s.write(b"dynamic".to_vec()).unwrap();
        s.end().unwrap();
        assert_eq!(gunzip_sync(s.read_to_end().unwrap(), None).unwrap(), "dynamic");

        assert!(create_stream(9, 6, 15).unwrap_err().is_engine_init());
        assert!(create_stream(0, 42, 15).unwrap_err().is_engine_init());
        assert!(create_stream(7, 6, 30).unwrap_err().is_engine_init());
    }

    #[test]
    fn events_iterator_stops_at_end() {
        let s = create_brotli_decompress(None).unwrap();
        s.write(brotli_compress_sync("evented", None).unwrap()).unwrap();
        s.end().unwrap();
        let events: Vec<_> = s.events().collect();
        assert_eq!(events.last(), Some(&StreamEvent::End));
        let body: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Data(b) => Some(b.to_vec()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(body, b"evented");
    }

    #[test]
    fn flush_callbacks_after_failure_run_exactly_once() {
        let s = create_inflate(None).unwrap();
        s.write(b"definitely not zlib".to_vec()).unwrap();
        assert!(s.read_to_end().is_err());

        let (tx, rx) = mpsc::channel();
        let rounds = 64;
        for i in 0..rounds {
            let tx = tx.clone();
            s.flush(None, Some(Box::new(move || {
                let _ = tx.send(i);
            })))
            .unwrap();
        }
        drop(tx);
        drop(s);

        let mut seen: Vec<i32> = rx.iter().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..rounds).collect::<Vec<_>>());
    }

    #[test]
    fn nothing_follows_close() {
        let mut s = create_deflate(None).unwrap();
        let data = payload();
        for chunk in data.chunks(97) {
            s.write(chunk.to_vec()).unwrap();
        }
        s.flush(Some(FlushMode::SyncFlush), None).unwrap();
        s.close(None);

        let mut closed = false;
        while let Some(ev) = s.recv_timeout(Duration::from_millis(300)) {
            if closed {
                assert_eq!(ev, StreamEvent::Close);
            }
            closed |= ev == StreamEvent::Close;
        }
        assert!(closed);
    }
}

