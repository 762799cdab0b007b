// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync error taxonomy (`spec.md` §7: Sync kind).

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{driver} exited with status {code}: {stderr_tail}")]
    DriverFailed { driver: &'static str, code: i32, stderr_tail: String },

    #[error("failed to spawn {driver}: {source}")]
    Spawn { driver: &'static str, #[source] source: std::io::Error },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{driver} did not inherit a piped stdout handle")]
    NoStdout { driver: &'static str },
}
