// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seam between a [`rr_core::Connection`] (the Selector's proof that an
//! alias is reachable) and the live [`Transport`] the Workflow actually
//! runs Lock/Sync/Execute commands through. Kept separate from `Prober` so
//! tests can fake transport dispatch without reimplementing probing.

use std::time::Duration;

use async_trait::async_trait;

use rr_core::Connection;
use rr_ssh::{LocalTransport, OpensshTransport, Transport, TransportError};

#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, conn: &Connection, timeout: Duration) -> Result<Box<dyn Transport>, TransportError>;
}

/// Real dialer: opens an `openssh` session for remote connections, or a
/// local subprocess transport when `conn.is_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshDialer;

#[async_trait]
impl Dialer for SshDialer {
    async fn dial(&self, conn: &Connection, timeout: Duration) -> Result<Box<dyn Transport>, TransportError> {
        if conn.is_local {
            return Ok(Box::new(LocalTransport::new(conn.remote_dir.clone())));
        }
        let transport = OpensshTransport::dial(&conn.alias, timeout).await?;
        Ok(Box::new(transport))
    }
}
