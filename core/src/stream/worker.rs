//! stream/worker.rs
//! Worker loop that owns a transform and executes queued operations in
//! submission order.

use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError};

use bytes::Bytes;
use crossbeam::channel::{Receiver, Sender};
use log::{debug, error};

use crate::options::FlushMode;
use crate::stream::{FlushCallback, StreamEvent, StreamFlags};
use crate::transform::ZlibTransform;
use crate::types::ZlibError;

pub(crate) enum StreamOp {
    Chunk(Bytes),
    Flush(FlushMode, Option<FlushCallback>),
    /// Callback queued behind everything already submitted.
    Notify(FlushCallback),
    End,
}

/// Send `event` unless the stream has been closed; `close` takes the same gate,
/// so nothing follows its `Close` event.
fn emit(tx: &Sender<StreamEvent>, flags: &StreamFlags, event: StreamEvent) {
    let _gate = flags.gate.lock().unwrap_or_else(PoisonError::into_inner);
    if !flags.closed.load(Ordering::SeqCst) {
        let _ = tx.send(event);
    }
}

fn emit_data(tx: &Sender<StreamEvent>, flags: &StreamFlags, out: Bytes) {
    if !out.is_empty() {
        emit(tx, flags, StreamEvent::Data(out));
    }
}

fn fail(tx: &Sender<StreamEvent>, flags: &StreamFlags, e: ZlibError) {
    error!("[STREAM] failed: {e}");
    flags.errored.store(true, Ordering::SeqCst);
    emit(tx, flags, StreamEvent::Error(e));
}

/// Run the callback carried by an op that will not be executed.
fn release(op: StreamOp) {
    match op {
        StreamOp::Flush(_, Some(cb)) | StreamOp::Notify(cb) => cb(),
        _ => {}
    }
}

/// Executes ops until every sender is gone. After a failure or close the
/// remaining ops only have their callbacks run.
pub(crate) fn run_stream_worker(
    mut transform: ZlibTransform,
    rx: Receiver<StreamOp>,
    tx: Sender<StreamEvent>,
    flags: Arc<StreamFlags>,
) {
    let mut failed = false;
    while let Ok(op) = rx.recv() {
        if failed || flags.closed.load(Ordering::SeqCst) {
            release(op);
            continue;
        }
        let result = match op {
            StreamOp::Chunk(chunk) => transform.transform(&chunk).map(|out| {
                flags.bytes_written.store(transform.bytes_written(), Ordering::SeqCst);
                emit_data(&tx, &flags, out);
            }),
            StreamOp::Flush(kind, callback) => match transform.flush(kind) {
                Ok(out) => {
                    emit_data(&tx, &flags, out);
                    if let Some(cb) = callback {
                        cb();
                    }
                    Ok(())
                }
                Err(e) => {
                    if let Some(cb) = callback {
                        cb();
                    }
                    Err(e)
                }
            },
            StreamOp::Notify(cb) => {
                cb();
                Ok(())
            }
            StreamOp::End => transform.finish().map(|out| {
                emit_data(&tx, &flags, out);
                debug!("[STREAM] {} end", transform.mode());
                emit(&tx, &flags, StreamEvent::End);
            }),
        };
        if let Err(e) = result {
            fail(&tx, &flags, e);
            transform.close();
            failed = true;
        }
    }
    transform.close();
    debug!("[STREAM] {} worker exit", transform.mode());
}
