// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport: open/close SSH sessions, run a remote command with streamed
//! stdout/stderr (`spec.md` §4.2).

use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use std::time::Duration;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use openssh::{KnownHosts, SessionBuilder};
use parking_lot::Mutex;
use tokio::io::AsyncWrite;

use crate::classify::classify_openssh_error;
use rr_core::{FailureDetail, FailureReason};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("dial `{alias}` failed: {reason:?} ({})", detail.message)]
    Dial { alias: String, reason: FailureReason, detail: FailureDetail },

    #[error("command spawn failed: {0}")]
    Spawn(#[source] openssh::Error),

    #[error("io error copying remote output: {0}")]
    Io(#[from] std::io::Error),

    #[error("session close failed: {0}")]
    Close(#[source] openssh::Error),

    #[error("child process did not inherit a piped {0} handle")]
    MissingPipe(&'static str),

    #[error("ssh session already closed")]
    SessionClosed,
}

/// Opens/closes SSH sessions and runs a single command with its stdout/
/// stderr streamed to caller-supplied sinks. `execStream` never buffers
/// the whole output in memory — it is a streaming `tokio::io::copy`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Real `Transport` backed by an `openssh` multiplexed session.
///
/// The session sits behind `tokio::sync::Mutex<Option<_>>` rather than a
/// bare field because `close(&self)` needs to actually consume and close
/// the underlying `openssh::Session` (its own `close` takes `self` by
/// value) despite `Transport::close` taking `&self` — the `Option` is
/// `.take()`n once, on whichever call (explicit or via `Drop` of the
/// workflow context) gets there first; every call after that is a no-op.
pub struct OpensshTransport {
    session: tokio::sync::Mutex<Option<openssh::Session>>,
    alias: String,
}

impl OpensshTransport {
    pub async fn dial(alias: &str, timeout: Duration) -> Result<Self, TransportError> {
        let session = SessionBuilder::default()
            .known_hosts_check(KnownHosts::Accept)
            .connect_timeout(timeout)
            .connect(alias)
            .await
            .map_err(|err| {
                let (reason, detail) = classify_openssh_error(&err, "", alias);
                TransportError::Dial { alias: alias.to_string(), reason, detail }
            })?;
        Ok(Self { session: tokio::sync::Mutex::new(Some(session)), alias: alias.to_string() })
    }
}

#[async_trait]
impl Transport for OpensshTransport {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(TransportError::SessionClosed)?;

        let mut command = session.command("sh");
        command.arg("-c").arg(cmd);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.stdin(Stdio::null());

        let mut child = command.spawn().await.map_err(TransportError::Spawn)?;
        let mut child_out = child.stdout().take().ok_or(TransportError::MissingPipe("stdout"))?;
        let mut child_err = child.stderr().take().ok_or(TransportError::MissingPipe("stderr"))?;

        let (copy_out, copy_err) =
            tokio::join!(tokio::io::copy(&mut child_out, out), tokio::io::copy(&mut child_err, err));
        copy_out?;
        copy_err?;

        let status = child.wait().await.map_err(TransportError::Spawn)?;
        Ok(exit_code_from_status(status))
    }

    async fn close(&self) -> Result<(), TransportError> {
        let Some(session) = self.session.lock().await.take() else {
            return Ok(());
        };
        tracing::debug!(alias = %self.alias, "closing ssh session");
        session.close().await.map_err(TransportError::Close)
    }
}

/// Lets a shared transport (e.g. a fake reused across several dialed
/// connections in tests) satisfy `Transport` without an extra wrapper.
#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError> {
        (**self).exec_stream(cmd, out, err).await
    }

    async fn close(&self) -> Result<(), TransportError> {
        (**self).close().await
    }
}

/// Maps a process exit status to the POSIX convention `spec.md` §4.2
/// requires: a normal exit returns its code; a signal exit returns
/// `128 + signal`.
pub fn exit_code_from_status(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        code
    } else if let Some(signal) = status.signal() {
        128 + signal
    } else {
        1
    }
}

/// In-memory sink that appends every write to a shared buffer. Used by
/// [`exec_capture`] for commands whose output is small and needed as a
/// string (lock holder files, rsync `--dry-run` previews) rather than
/// streamed to the terminal.
#[derive(Clone, Default)]
pub struct CaptureSink(Arc<Mutex<Vec<u8>>>);

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl AsyncWrite for CaptureSink {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        self.0.lock().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Output of a captured (non-streamed) command run.
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` through `transport`, capturing stdout/stderr as strings
/// instead of streaming them. Used by `rr-lock` (mkdir/cat/rm, all against
/// the remote host the lock lives on — liveness of a holder's pid is
/// always checked locally, never through this) and `rr-sync`
/// (`--dry-run` preview parsing).
pub async fn exec_capture(transport: &dyn Transport, cmd: &str) -> Result<CapturedOutput, TransportError> {
    let mut out = CaptureSink::new();
    let mut err = CaptureSink::new();
    let exit_code = transport.exec_stream(cmd, &mut out, &mut err).await?;
    Ok(CapturedOutput { exit_code, stdout: out.into_string(), stderr: err.into_string() })
}
