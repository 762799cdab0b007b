// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock error taxonomy (`spec.md` §7: Lock kind).

use rr_ssh::TransportError;

use crate::holder::Holder;

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("locked by {0}")]
    Locked(Holder),

    #[error("timed out acquiring lock after {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to force-release lock at {0}")]
    ForceReleaseFailed(String),

    #[error("{0}")]
    Other(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl LockError {
    pub fn holder_name(&self) -> Option<String> {
        match self {
            LockError::Locked(holder) => Some(holder.to_string()),
            _ => None,
        }
    }
}
