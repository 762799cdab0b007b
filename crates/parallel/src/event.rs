// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle events, decoupling execution from rendering (`spec.md`
//! §4.8: "Rendering is decoupled from execution: workers write to
//! per-task byte buffers and emit lifecycle events; the renderer consumes
//! events on a single thread").

use rr_core::TaskStatus;

#[derive(Debug, Clone)]
pub enum TaskEvent {
    Started { name: String, index: usize, host: String },
    /// One chunk of output as it arrives — only emitted in `Stream` mode,
    /// where lines are interleaved and prefixed by task name.
    Output { name: String, index: usize, line: String },
    Completed { name: String, index: usize, host: String, status: TaskStatus, exit_code: i32 },
    /// Dropped without running: the queue was drained after a fail-fast
    /// cancellation.
    Skipped { name: String, index: usize },
}
