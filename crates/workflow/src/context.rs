// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WorkflowContext`: the scoped handle returned by [`crate::setup::setup_workflow`]
//! (`spec.md` §4.6 entry). Owns exactly one live [`Connection`]/lock pair and
//! guarantees idempotent teardown.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rr_config::Resolved;
use rr_core::Connection;
use rr_lock::LockHandle;
use rr_ssh::Transport;

use crate::error::WorkflowError;

/// Observable phase names, in the order `spec.md` §4.6 requires them to
/// run. Surfaced so a CLI renderer can print "Connect... Lock... Sync..."
/// without the Workflow depending on any particular UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoadConfig,
    WorkingDir,
    SelectorSetup,
    Connect,
    Lock,
    Sync,
}

pub struct WorkflowContext {
    pub resolved: Resolved,
    pub connection: Connection,
    pub lock: Option<LockHandle>,
    pub transport: Box<dyn Transport>,
    pub working_dir: PathBuf,
    pub started_at: Instant,
    closed: AtomicBool,
}

impl WorkflowContext {
    pub fn new(resolved: Resolved, connection: Connection, lock: Option<LockHandle>, transport: Box<dyn Transport>, working_dir: PathBuf) -> Self {
        Self { resolved, connection, lock, transport, working_dir, started_at: Instant::now(), closed: AtomicBool::new(false) }
    }

    /// Releases the lock (if any is held) and closes the transport.
    /// Idempotent — a second call is a no-op (`spec.md` §5's once-gate).
    pub async fn close(&self) -> Result<(), WorkflowError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(lock) = &self.lock {
            if let Err(err) = rr_lock::release(self.transport.as_ref(), lock).await {
                tracing::warn!(error = %err, "lock release failed during teardown");
            }
        }
        if let Err(err) = self.transport.close().await {
            tracing::warn!(error = %err, "transport close failed during teardown");
        }
        Ok(())
    }
}
