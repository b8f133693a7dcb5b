// src/exec/relay.rs

//! Line relay for a child's diagnostic stream.
//!
//! The relay reads in arbitrary chunks, forwards each complete line as soon
//! as its newline arrives and keeps at most one partial line buffered. Bytes
//! left over at end-of-stream are flushed as a final line. Once the child
//! has exited, the stream is read only briefly more, then relaying stops.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::ChildStderr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{Instrument, debug, debug_span, warn};

use crate::exec::sink::LineSink;

const READ_CHUNK: usize = 8192;

/// How long to keep reading after the child has been reaped.
pub const EXIT_DRAIN: Duration = Duration::from_millis(200);

/// Splits a byte stream into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, calling `emit` once per completed line.
    pub fn push<F>(&mut self, chunk: &[u8], mut emit: F)
    where
        F: FnMut(&[u8]),
    {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.pending.is_empty() {
                emit(&rest[..pos]);
            } else {
                self.pending.extend_from_slice(&rest[..pos]);
                emit(&self.pending);
                self.pending.clear();
            }
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
    }

    /// Bytes received since the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// End of stream: emit the unterminated tail, if any.
    pub fn finish<F>(self, mut emit: F)
    where
        F: FnMut(&[u8]),
    {
        if !self.pending.is_empty() {
            emit(&self.pending);
        }
    }
}

/// Counters for one relayed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Lines handed to the sink.
    pub lines: u64,
    /// Lines read but not delivered because the sink failed.
    pub dropped: u64,
}

/// Forward `reader` to `sink` until end-of-stream.
///
/// A failing sink does not stop the relay: the stream is drained to the end
/// regardless so the child never blocks on a full pipe.
pub async fn relay<R>(reader: R, sink: &mut dyn LineSink) -> io::Result<RelayStats>
where
    R: AsyncRead + Unpin,
{
    relay_until(reader, sink, std::future::pending()).await
}

/// Like [`relay`], but stop once `exited` resolves and the stream goes quiet.
///
/// After `exited` the relay keeps reading for at most [`EXIT_DRAIN`], so a
/// background grandchild still holding the write end cannot stall the run.
/// The pending partial line is flushed either way.
pub async fn relay_until<R, E>(
    mut reader: R,
    sink: &mut dyn LineSink,
    exited: E,
) -> io::Result<RelayStats>
where
    R: AsyncRead + Unpin,
    E: Future<Output = ()>,
{
    let mut buf = vec![0u8; READ_CHUNK];
    let mut splitter = LineSplitter::new();
    let mut stats = RelayStats::default();
    let mut sink_failed = false;
    let mut drain_deadline: Option<Instant> = None;
    tokio::pin!(exited);

    let mut deliver = |line: &[u8]| {
        debug!(line = %String::from_utf8_lossy(line), "relayed");
        if sink_failed {
            stats.dropped += 1;
            return;
        }
        match sink.write_line(line) {
            Ok(()) => stats.lines += 1,
            Err(e) => {
                warn!(error = %e, "log sink failed; discarding further output");
                sink_failed = true;
                stats.dropped += 1;
            }
        }
    };

    loop {
        let read = match drain_deadline {
            Some(deadline) => match timeout_at(deadline, reader.read(&mut buf)).await {
                Ok(read) => read,
                Err(_) => {
                    debug!("child exited but stream still open; stopping relay");
                    break;
                }
            },
            None => {
                let step = tokio::select! {
                    biased;
                    read = reader.read(&mut buf) => Some(read),
                    () = &mut exited => None,
                };
                match step {
                    Some(read) => read,
                    None => {
                        drain_deadline = Some(Instant::now() + EXIT_DRAIN);
                        continue;
                    }
                }
            }
        };

        let n = match read {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // Whatever arrived before the failure still counts.
                splitter.finish(&mut deliver);
                return Err(e);
            }
        };
        splitter.push(&buf[..n], &mut deliver);
    }

    splitter.finish(&mut deliver);
    Ok(stats)
}

/// Run [`relay_until`] for a child's stderr on its own task.
///
/// `exited` fires once the child has been reaped. The sink is dropped
/// (closing any log channel) when the relay ends.
pub fn spawn_relay(
    stderr: ChildStderr,
    mut sink: Box<dyn LineSink>,
    name: String,
    exited: oneshot::Receiver<()>,
) -> JoinHandle<io::Result<RelayStats>> {
    let span = debug_span!("relay", entry = %name);
    tokio::spawn(
        async move {
            // A dropped sender means the waiter is gone; treat it as exited.
            let exited = async move {
                let _ = exited.await;
            };
            let result = relay_until(stderr, sink.as_mut(), exited).await;
            match &result {
                Ok(stats) => debug!(lines = stats.lines, dropped = stats.dropped, "stderr relay finished"),
                Err(e) => warn!(entry = %name, error = %e, "stderr relay failed"),
            }
            result
        }
        .instrument(span),
    )
}
