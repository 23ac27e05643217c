//! async_api.rs
//! Callback and future facades over the one-shot calls.
//!
//! Work runs on a pool of queue workers, never on the caller's thread, so a
//! completion is always observed after the submitting call has returned.
//! Each accepted submission completes exactly once.

use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver, Sender};
use futures::channel::oneshot;
use log::{debug, warn};

use crate::modes::Mode;
use crate::oneshot::process_sync;
use crate::options::ZlibOptions;
use crate::types::ZlibError;
use crate::utils::ZlibInput;

pub type Completion = Box<dyn FnOnce(Result<Bytes, ZlibError>) + Send + 'static>;

struct Job {
    mode: Mode,
    input: ZlibInput,
    options: Option<ZlibOptions>,
    done: Completion,
}

fn run_queue_worker(rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        let result = process_sync(job.mode, job.input, job.options.as_ref());
        if let Err(e) = &result {
            debug!("[ASYNC] {} failed: {}", job.mode, e);
        }
        (job.done)(result);
    }
}

pub struct OperationQueue {
    tx: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl OperationQueue {
    pub fn new(workers: usize) -> Self {
        let (tx, rx) = unbounded::<Job>();
        let workers = (0..workers.max(1))
            .filter_map(|i| {
                let rx = rx.clone();
                thread::Builder::new()
                    .name(format!("zstream-async-{i}"))
                    .spawn(move || run_queue_worker(rx))
                    .map_err(|e| warn!("[ASYNC] worker {i} failed to start: {e}"))
                    .ok()
            })
            .collect::<Vec<_>>();
        debug!("[ASYNC] queue started with {} workers", workers.len());
        Self {
            tx: Some(tx),
            workers,
        }
    }

    pub fn with_default_workers() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Dynamic entry point: a missing callback fails immediately with
    /// `CallbackContract` and nothing is queued.
    pub fn submit(
        &self,
        mode: Mode,
        input: impl Into<ZlibInput>,
        options: Option<&ZlibOptions>,
        callback: Option<Completion>,
    ) -> Result<(), ZlibError> {
        let done = callback
            .ok_or_else(|| ZlibError::CallbackContract("callback must be a function".into()))?;
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| ZlibError::State("operation queue is shut down".into()))?;
        if self.workers.is_empty() {
            return Err(ZlibError::State("operation queue has no workers".into()));
        }
        tx.send(Job {
            mode,
            input: input.into(),
            options: options.cloned(),
            done,
        })
        .map_err(|_| ZlibError::State("operation queue is shut down".into()))
    }

    pub fn run<F>(
        &self,
        mode: Mode,
        input: impl Into<ZlibInput>,
        options: Option<&ZlibOptions>,
        callback: F,
    ) -> Result<(), ZlibError>
    where
        F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
    {
        self.submit(mode, input, options, Some(Box::new(callback)))
    }

    pub fn spawn(
        &self,
        mode: Mode,
        input: impl Into<ZlibInput>,
        options: Option<&ZlibOptions>,
    ) -> ZlibTask {
        let (tx, rx) = oneshot::channel();
        let rejected = self
            .run(mode, input, options, move |result| {
                let _ = tx.send(result);
            })
            .err();
        ZlibTask { rx, rejected }
    }
}

impl Drop for OperationQueue {
    fn drop(&mut self) {
        self.tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Future resolving to the result of one queued operation.
pub struct ZlibTask {
    rx: oneshot::Receiver<Result<Bytes, ZlibError>>,
    rejected: Option<ZlibError>,
}

impl Future for ZlibTask {
    type Output = Result<Bytes, ZlibError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(e) = self.rejected.take() {
            return Poll::Ready(Err(e));
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(ZlibError::State(
                "operation dropped before completion".into(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Process-wide queue used by the free functions below.
pub fn default_queue() -> &'static OperationQueue {
    static QUEUE: OnceLock<OperationQueue> = OnceLock::new();
    QUEUE.get_or_init(OperationQueue::with_default_workers)
}

pub fn submit(
    mode: Mode,
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: Option<Completion>,
) -> Result<(), ZlibError> {
    default_queue().submit(mode, input, options, callback)
}

pub fn deflate<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::Deflate, input, options, callback)
}

pub fn inflate<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::Inflate, input, options, callback)
}

pub fn gzip<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::Gzip, input, options, callback)
}

pub fn gunzip<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::Gunzip, input, options, callback)
}

pub fn deflate_raw<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::DeflateRaw, input, options, callback)
}

pub fn inflate_raw<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::InflateRaw, input, options, callback)
}

pub fn unzip<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::Unzip, input, options, callback)
}

pub fn brotli_compress<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::BrotliCompress, input, options, callback)
}

pub fn brotli_decompress<F>(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
    callback: F,
) -> Result<(), ZlibError>
where
    F: FnOnce(Result<Bytes, ZlibError>) + Send + 'static,
{
    default_queue().run(Mode::BrotliDecompress, input, options, callback)
}

pub fn deflate_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::Deflate, input, options)
}

pub fn inflate_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::Inflate, input, options)
}

pub fn gzip_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::Gzip, input, options)
}

pub fn gunzip_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::Gunzip, input, options)
}

pub fn deflate_raw_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::DeflateRaw, input, options)
}

pub fn inflate_raw_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::InflateRaw, input, options)
}

pub fn unzip_async(input: impl Into<ZlibInput>, options: Option<&ZlibOptions>) -> ZlibTask {
    default_queue().spawn(Mode::Unzip, input, options)
}

pub fn brotli_compress_async(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> ZlibTask {
    default_queue().spawn(Mode::BrotliCompress, input, options)
}

pub fn brotli_decompress_async(
    input: impl Into<ZlibInput>,
    options: Option<&ZlibOptions>,
) -> ZlibTask {
    default_queue().spawn(Mode::BrotliDecompress, input, options)
}
