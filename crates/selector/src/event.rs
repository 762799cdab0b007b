// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted while a [`crate::Selector`] scans hosts for a reachable
//! alias (`spec.md` §4.5). Emitted in order; the connected event, when it
//! occurs, is always last.

use std::time::Duration;

use rr_core::FailureReason;

#[derive(Debug, Clone)]
pub enum SelectEvent {
    Attempt { alias: String },
    Failed { alias: String, latency: Duration, reason: FailureReason, message: String },
    Connected { alias: String, latency: Duration },
    LocalFallback,
}

/// Forward each event to `tracing`, matching what a CLI running with
/// `RUST_LOG=info` would see even without a dedicated UI layer wired up.
pub fn tracing_event_handler(event: &SelectEvent) {
    match event {
        SelectEvent::Attempt { alias } => tracing::info!(alias, "probing alias"),
        SelectEvent::Failed { alias, latency, reason, message } => {
            tracing::warn!(alias, ?latency, ?reason, message, "alias unreachable")
        }
        SelectEvent::Connected { alias, latency } => tracing::info!(alias, ?latency, "connected"),
        SelectEvent::LocalFallback => tracing::warn!("falling back to local execution"),
    }
}
