// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-consumer renderer (`spec.md` §4.8, §5): "Terminal stdout/stderr
//! — mutated only by the renderer goroutine; workers never write
//! directly." Output mode controls verbosity; the interactive spinner/
//! picker chrome built on top of this stream is out of scope (`spec.md`
//! §1) and belongs to the CLI layer.

use rr_core::OutputMode;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::event::TaskEvent;

/// Drains `events` until the channel closes, printing according to
/// `mode`. Runs as its own task so execution never blocks on rendering.
pub async fn render(mut events: UnboundedReceiver<TaskEvent>, mode: OutputMode) {
    while let Some(event) = events.recv().await {
        match (mode, event) {
            (OutputMode::Quiet, _) => {}
            (_, TaskEvent::Started { name, host, .. }) => {
                println!("[{name}] started on {host}");
            }
            (OutputMode::Stream, TaskEvent::Output { name, line, .. }) => {
                for chunk in line.lines() {
                    println!("[{name}] {chunk}");
                }
            }
            (_, TaskEvent::Output { .. }) => {}
            (_, TaskEvent::Completed { name, host, status, exit_code, .. }) => {
                println!("[{name}] {status:?} on {host} (exit {exit_code})");
            }
            (_, TaskEvent::Skipped { name, .. }) => {
                println!("[{name}] skipped");
            }
        }
    }
}
