// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seam between the Selector's alias-iteration logic and the concrete
//! probe mechanism, so the Selector can be exercised without a real SSH
//! fleet (mirrors `rr-ssh`'s `Transport` trait playing the same role for
//! command execution).

use std::time::Duration;

use async_trait::async_trait;

use rr_ssh::ProbeError;

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, alias: &str, timeout: Duration) -> Result<Duration, ProbeError>;
}

/// Real prober: delegates to `rr_ssh::probe`, which opens an actual SSH
/// session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshProber;

#[async_trait]
impl Prober for SshProber {
    async fn probe(&self, alias: &str, timeout: Duration) -> Result<Duration, ProbeError> {
        rr_ssh::probe(alias, timeout).await
    }
}
