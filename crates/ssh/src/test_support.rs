// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake [`Transport`] for tests in downstream crates (`rr-lock`, `rr-sync`,
//! `rr-workflow`, `rr-parallel`) that need to exercise command dispatch
//! without a real SSH fleet. Mirrors `rr_core::test_support`'s pattern of
//! gating fixtures behind a `test-support` feature.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::transport::{Transport, TransportError};

/// Canned response for one command pattern.
#[derive(Debug, Clone, Default)]
pub struct FakeResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl FakeResponse {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failing(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code, stdout: String::new(), stderr: stderr.into() }
    }
}

/// A `Transport` that matches commands by substring against canned
/// responses and records every command it was asked to run, so tests can
/// assert on dispatch order without a real SSH fleet.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<Vec<(String, FakeResponse)>>,
    default_response: Mutex<FakeResponse>,
    history: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to any command containing `pattern` with `response`. The
    /// first matching pattern registered wins.
    pub fn on(self, pattern: impl Into<String>, response: FakeResponse) -> Self {
        self.responses.lock().push((pattern.into(), response));
        self
    }

    pub fn with_default(self, response: FakeResponse) -> Self {
        *self.default_response.lock() = response;
        self
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError> {
        self.history.lock().push(cmd.to_string());
        let responses = self.responses.lock();
        let response = responses
            .iter()
            .find(|(pattern, _)| cmd.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.lock().clone());
        drop(responses);

        out.write_all(response.stdout.as_bytes()).await?;
        err.write_all(response.stderr.as_bytes()).await?;
        Ok(response.exit_code)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
