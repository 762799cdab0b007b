// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streams a command's output straight to the terminal while keeping a
//! bounded tail in memory, so a non-zero exit can be checked for a
//! missing-tool signature without ever buffering the full output
//! (`spec.md` §4.2: "The caller may wrap the sinks to also capture a
//! bounded tail for error classification").

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::io::AsyncWrite;

pub struct TailSink {
    inner: Pin<Box<dyn AsyncWrite + Send>>,
    tail: Arc<Mutex<Vec<u8>>>,
    cap: usize,
}

impl TailSink {
    pub fn new(inner: impl AsyncWrite + Send + 'static, cap: usize) -> Self {
        Self { inner: Box::pin(inner), tail: Arc::new(Mutex::new(Vec::new())), cap }
    }

    pub fn tail_handle(&self) -> Arc<Mutex<Vec<u8>>> {
        self.tail.clone()
    }
}

/// Render a sink's captured tail as lossy UTF-8, bounded by construction.
pub fn tail_to_string(tail: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8_lossy(&tail.lock()).into_owned()
}

impl AsyncWrite for TailSink {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                let mut tail = this.tail.lock();
                tail.extend_from_slice(&buf[..n]);
                if tail.len() > this.cap {
                    let excess = tail.len() - this.cap;
                    tail.drain(0..excess);
                }
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.get_mut().inner.as_mut().poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.get_mut().inner.as_mut().poll_shutdown(cx)
    }
}
