// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel orchestrator error taxonomy (`spec.md` §4.8, §7).

use rr_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ParallelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A `parallel:[...]` reference forms a cycle through task names.
    #[error("task graph has a cycle reaching `{0}`")]
    Cycle(String),

    /// A task (or a `steps`/`parallel` reference) names a task that does
    /// not exist in the project's task table.
    #[error("unknown task `{0}`")]
    UnknownTask(String),

    /// Every candidate host failed to yield a worker (none reachable, all
    /// locked past the wait timeout, and local fallback disabled).
    #[error("no host became available for any worker")]
    NoHostsAvailable,

    #[error("failed to write log file {path}: {source}")]
    LogWrite { path: String, #[source] source: std::io::Error },

    #[error("failed to write run summary {path}: {source}")]
    SummaryWrite { path: String, #[source] source: std::io::Error },

    #[error("failed to serialize run summary: {0}")]
    SummarySerialize(#[from] serde_json::Error),
}
