#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use futures::executor::block_on;
    use zstream_core::async_api::{self, OperationQueue};
    use zstream_core::modes::Mode;
    use zstream_core::oneshot::*;
    use zstream_core::utils::{Encoding, ZlibInput};
    use zstream_core::ZlibError;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn callback_runs_off_the_caller_thread_exactly_once() {
        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();
        async_api::deflate("hello", None, move |result| {
            let _ = tx.send((thread::current().id(), result));
        })
        .unwrap();

        let (ran_on, result) = rx.recv_timeout(WAIT).unwrap();
        assert_ne!(ran_on, caller);
        assert_eq!(result.unwrap(), deflate_sync("hello", None).unwrap());
        // The sender was consumed by the single invocation.
        assert!(rx.recv_timeout(WAIT).is_err());
    }

    #[test]
    fn missing_callback_fails_fast() {
        let err = async_api::submit(Mode::Gzip, "data", None, None).unwrap_err();
        assert!(matches!(err, ZlibError::CallbackContract(_)));
        assert_eq!(err.kind_name(), "CallbackContractError");
    }

    #[test]
    fn errors_are_delivered_through_the_callback() {
        let (tx, rx) = mpsc::channel();
        async_api::gunzip("not gzip", None, move |r| {
            let _ = tx.send(r);
        })
        .unwrap();
        assert!(rx.recv_timeout(WAIT).unwrap().unwrap_err().is_engine_data());

        let (tx, rx) = mpsc::channel();
        async_api::inflate(ZlibInput::text("zz", Encoding::Hex), None, move |r| {
            let _ = tx.send(r);
        })
        .unwrap();
        assert!(matches!(
            rx.recv_timeout(WAIT).unwrap(),
            Err(ZlibError::InvalidInputType(_))
        ));
    }

    #[test]
    fn futures_chain_roundtrip() {
        let packed = block_on(async_api::gzip_async("future payload", None)).unwrap();
        let plain = block_on(async_api::unzip_async(packed, None)).unwrap();
        assert_eq!(plain, "future payload");

        let br = block_on(async_api::brotli_compress_async(Vec::<u8>::new(), None)).unwrap();
        assert!(block_on(async_api::brotli_decompress_async(br, None)).unwrap().is_empty());
    }

    #[test]
    fn every_async_entry_point_completes() {
        let data = b"async entry points".to_vec();
        let raw = deflate_raw_sync(data.as_slice(), None).unwrap();
        let results = [
            block_on(async_api::inflate_async(deflate_sync(data.as_slice(), None).unwrap(), None)),
            block_on(async_api::gunzip_async(gzip_sync(data.as_slice(), None).unwrap(), None)),
            block_on(async_api::inflate_raw_async(raw, None)),
        ];
        for r in results {
            assert_eq!(r.unwrap(), data);
        }
        assert!(block_on(async_api::deflate_raw_async(data.as_slice(), None)).is_ok());
        assert!(block_on(async_api::deflate_async(data.as_slice(), None)).is_ok());
    }

    #[test]
    fn private_queue_handles_many_jobs() {
        let queue = OperationQueue::new(2);
        assert_eq!(queue.worker_count(), 2);
        let (tx, rx) = mpsc::channel();
        for i in 0..32u32 {
            let tx = tx.clone();
            queue
                .run(Mode::BrotliCompress, i.to_string(), None, move |r| {
                    let _ = tx.send((i, r));
                })
                .unwrap();
        }
        drop(tx);

        let mut seen = 0;
        while let Ok((i, r)) = rx.recv_timeout(WAIT) {
            let plain = brotli_decompress_sync(r.unwrap(), None).unwrap();
            assert_eq!(plain, i.to_string().as_str());
            seen += 1;
        }
        assert_eq!(seen, 32);
    }

    #[test]
    fn spawned_task_reports_rejection() {
        let queue = OperationQueue::new(1);
        let task = queue.spawn(Mode::Inflate, "junk", None);
        assert!(block_on(task).unwrap_err().is_engine_data());
    }
}
