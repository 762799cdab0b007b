// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow error taxonomy (`spec.md` §4.6, §4.7, §7).

use rr_config::ConfigError;
use rr_lock::LockError;
use rr_selector::SelectError;
use rr_ssh::TransportError;
use rr_sync::SyncError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Every candidate host in a load-balanced setup is locked and the
    /// round-robin wait timed out (`spec.md` §4.7 step 6's final case).
    #[error("all hosts locked: {}", holders.iter().map(|(h, who)| format!("{h} (held by {who})")).collect::<Vec<_>>().join(", "))]
    AllHostsLocked { holders: Vec<(String, String)> },

    /// Every candidate Connection in the round-robin wait died (transport
    /// error unrelated to locking).
    #[error("all candidate connections failed during the load-balanced wait")]
    AllConnectionsDied,
}
