use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::process::ScanProcess;
use crate::types::StreamKind;

/// Read size per pipe; matches the chunk granularity the client sees.
pub const CHUNK_SIZE: usize = 8192;

/// Chunks the console echo may lag behind before it starts dropping.
const ECHO_DEPTH: usize = 16;

/// Client-facing byte channel. Capacity 1: at most one chunk is in flight,
/// so a slow client exerts backpressure on the selected pipe instead of us
/// buffering the scan output.
pub type Sink = mpsc::Sender<Result<Bytes, std::io::Error>>;

/// How one multiplexer run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The process exited on its own and every drained byte was delivered.
    Completed,
    /// The client went away mid-stream; the process was killed.
    ClientDisconnected,
}

/// Pump a scan process's two output pipes until it exits or the client
/// disconnects.
///
/// Both pipes are always drained concurrently, whichever one is selected:
/// testssl.sh writes to both and stalls if either pipe's buffer fills.
/// Chunks from the selected pipe go to `sink` in production order; the other
/// pipe's output is discarded. A failed sink send means the client is gone:
/// the process gets a non-graceful kill and the run winds down.
///
/// Returns only after the child has been reaped AND both drain tasks have
/// finished, so the caller may close the response as soon as this resolves.
pub async fn multiplex(
    proc: ScanProcess,
    selected: StreamKind,
    sink: Sink,
    console_echo: bool,
) -> Outcome {
    let ScanProcess {
        mut child,
        stdout,
        stderr,
    } = proc;

    let cancel = CancellationToken::new();

    let (primary_sink, secondary_sink) = match selected {
        StreamKind::Primary => (Some(sink), None),
        StreamKind::Secondary => (None, Some(sink)),
    };

    // Console echo runs on its own task behind its own channel so a slow or
    // blocked local console can never hold up the client-facing write. The
    // task winds down when the primary drain drops its sender.
    let echo = if console_echo {
        let (tx, mut rx) = mpsc::channel::<Bytes>(ECHO_DEPTH);
        tokio::spawn(async move {
            let mut out = tokio::io::stdout();
            while let Some(chunk) = rx.recv().await {
                if out.write_all(&chunk).await.is_err() {
                    break;
                }
            }
        });
        Some(tx)
    } else {
        None
    };

    let primary = tokio::spawn(drain(stdout, primary_sink, echo, cancel.clone(), "primary"));
    let secondary = tokio::spawn(drain(stderr, secondary_sink, None, cancel.clone(), "secondary"));

    // Wait for natural exit, or kill on client disconnect. This is the only
    // kill site, so a process is signalled at most once even if failure
    // signals race.
    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = cancel.cancelled() => None,
    };
    let status = match exited {
        Some(status) => status,
        None => {
            // start_kill errors if the child already exited; that is fine.
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "kill after disconnect (child already gone)");
            }
            child.wait().await
        }
    };

    match status {
        Ok(status) => debug!(%status, "scan process exited"),
        Err(e) => debug!(error = %e, "failed to reap scan process"),
    }

    // Both pipes reach EOF once the process is gone, so these joins cannot
    // hang. Completion must not be signalled while either drain still runs.
    let _ = primary.await;
    let _ = secondary.await;

    if cancel.is_cancelled() {
        Outcome::ClientDisconnected
    } else {
        Outcome::Completed
    }
}

/// Drain one pipe to EOF, chunk by chunk.
///
/// `sink` is `Some` only for the selected pipe. Each chunk is written out
/// before the next read. Read errors are treated like EOF: the scan is not
/// worth failing over a broken pipe read, and the process reaper handles the
/// rest.
async fn drain<R: AsyncRead + Unpin>(
    mut reader: R,
    sink: Option<Sink>,
    echo: Option<mpsc::Sender<Bytes>>,
    cancel: CancellationToken,
    name: &'static str,
) {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(stream = name, error = %e, "read error, treating as end of stream");
                break;
            }
        };
        let chunk = Bytes::copy_from_slice(&buf[..n]);

        if let Some(tx) = echo.as_ref() {
            // Best effort: a console that falls behind loses echo chunks
            // rather than stalling the client-facing write.
            let _ = tx.try_send(chunk.clone());
        }

        if let Some(tx) = sink.as_ref() {
            if tx.send(Ok(chunk)).await.is_err() {
                debug!(stream = name, "client disconnected");
                cancel.cancel();
                break;
            }
        }
    }
    debug!(stream = name, "drained");
}
