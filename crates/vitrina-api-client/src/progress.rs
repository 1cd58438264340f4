//! Byte-level upload progress.
//!
//! The file body is handed to the HTTP stack in fixed-size chunks; each chunk
//! pulled from the stream advances the reported percentage. Progress tops out
//! at 99 until the server has answered, so 100 always means "stored".

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;

/// Receives an upload percentage in `0..=100`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Receives `(file index, percentage)` for multi-file uploads.
pub type FileProgressFn = Arc<dyn Fn(usize, u8) + Send + Sync>;

pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub fn noop_progress() -> ProgressFn {
    Arc::new(|_| {})
}

/// Percentage while bytes are in flight, capped at 99.
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 99;
    }
    let percent = sent.saturating_mul(100) / total;
    percent.min(99) as u8
}

pub fn progress_stream(
    data: Bytes,
    on_progress: ProgressFn,
) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
    let total = data.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(total)))
        .collect();

    let mut sent = 0u64;
    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        on_progress(upload_percent(sent, total as u64));
        Ok(chunk)
    }))
}
