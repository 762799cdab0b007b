// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `Transport` that runs commands on the local machine instead of over
//! SSH, backing the Selector's local-fallback `Connection` (`spec.md`
//! §4.5, §4.6).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::process::Command;

use crate::transport::{exit_code_from_status, Transport, TransportError};

/// Runs `sh -c <cmd>` as a child process in `working_dir`, streaming its
/// stdout/stderr the same way `OpensshTransport` does, so callers never
/// need to branch on `Connection::is_local` when executing a command.
pub struct LocalTransport {
    working_dir: String,
}

impl LocalTransport {
    pub fn new(working_dir: impl Into<String>) -> Self {
        Self { working_dir: working_dir.into() }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError> {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd).current_dir(&self.working_dir);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.stdin(Stdio::null());

        let mut child = command.spawn()?;
        let mut child_out = child.stdout.take().ok_or(TransportError::MissingPipe("stdout"))?;
        let mut child_err = child.stderr.take().ok_or(TransportError::MissingPipe("stderr"))?;

        let (copy_out, copy_err) =
            tokio::join!(tokio::io::copy(&mut child_out, out), tokio::io::copy(&mut child_err, err));
        copy_out?;
        copy_err?;

        let status = child.wait().await?;
        Ok(exit_code_from_status(status))
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::exec_capture;

    #[tokio::test]
    async fn runs_command_in_working_dir() {
        let transport = LocalTransport::new("/tmp");
        let out = exec_capture(&transport, "pwd").await.unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "/tmp");
    }
}
