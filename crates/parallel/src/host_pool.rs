// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hands hosts to parallel workers "using the same load-balanced
//! discipline as §4.7" (`spec.md` §4.8): a sequential first pass across
//! candidate hosts collecting every immediately-available Connection+Lock,
//! then — if fewer claims were won than workers are wanted and local
//! fallback is disabled — a round-robin wait over the hosts that were
//! merely locked by someone else.
//!
//! Acquisition itself stays sequential (mirroring the ordering guarantee
//! in `spec.md` §5: "host attempts are sequential... this predictability
//! is a contract"); only task *execution* afterwards is concurrent.

use std::time::{Duration, Instant};

use rr_core::{Clock, Connection, HostName, ProjectFingerprint};
use rr_lock::{LockError, LockHandle, LockOptions};
use rr_selector::{Prober, Selector};
use rr_ssh::Transport;
use rr_workflow::Dialer;

const WAIT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A host (or the synthetic local fallback) handed to one worker.
pub struct HostClaim {
    pub connection: Connection,
    pub transport: Box<dyn Transport>,
    pub lock: Option<LockHandle>,
}

impl HostClaim {
    pub fn label(&self) -> &str {
        if self.connection.is_local {
            "local"
        } else {
            self.connection.host_name.as_str()
        }
    }

    pub async fn release(&self) {
        if let Some(lock) = &self.lock {
            if let Err(err) = rr_lock::release(self.transport.as_ref(), lock).await {
                tracing::warn!(host = self.label(), error = %err, "lock release failed during teardown");
            }
        }
        if let Err(err) = self.transport.close().await {
            tracing::warn!(host = self.label(), error = %err, "transport close failed during teardown");
        }
    }
}

struct Kept {
    connection: Connection,
    transport: Box<dyn Transport>,
    holder: String,
}

/// Gather up to `want` host claims for a parallel run.
#[allow(clippy::too_many_arguments)]
pub async fn acquire_worker_claims<P: Prober, D: Dialer>(
    selector: &Selector<P>,
    dialer: &D,
    candidates: &[HostName],
    want: usize,
    lock_enabled: bool,
    lock_opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
    dial_timeout: Duration,
    wait_timeout: Duration,
) -> Vec<HostClaim> {
    let mut claims = Vec::new();
    let mut kept: Vec<Kept> = Vec::new();

    for name in candidates {
        if claims.len() >= want {
            break;
        }
        let conn = match selector.select_host(name.as_str()).await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::debug!(host = %name, error = %err, "host selection failed, skipping");
                continue;
            }
        };
        let transport = match dialer.dial(&conn, dial_timeout).await {
            Ok(transport) => transport,
            Err(err) => {
                tracing::debug!(host = %name, error = %err, "dial failed, skipping");
                continue;
            }
        };

        if conn.is_local || !lock_enabled {
            claims.push(HostClaim { connection: conn, transport, lock: None });
            continue;
        }

        match rr_lock::try_acquire(transport.as_ref(), lock_opts, fingerprint, project_path, clock, local_host).await {
            Ok(handle) => claims.push(HostClaim { connection: conn, transport, lock: Some(handle) }),
            Err(LockError::Locked(holder)) => kept.push(Kept { connection: conn, transport, holder: holder.to_string() }),
            Err(err) => {
                tracing::debug!(host = %name, error = %err, "lock attempt failed, dropping connection");
                let _ = transport.close().await;
            }
        }
    }

    if claims.len() >= want || kept.is_empty() {
        drop_all(kept).await;
        return claims;
    }

    if selector.local_fallback() {
        tracing::info!(locked_hosts = kept.len(), "falling back to local execution for remaining workers");
        drop_all(kept).await;
        while claims.len() < want {
            let local = Connection::local(selector.local_dir().to_string());
            match dialer.dial(&local, dial_timeout).await {
                Ok(transport) => claims.push(HostClaim { connection: local, transport, lock: None }),
                Err(err) => {
                    tracing::warn!(error = %err, "local fallback dial failed");
                    break;
                }
            }
        }
        return claims;
    }

    round_robin_fill(claims, kept, want, lock_opts, fingerprint, project_path, clock, local_host, wait_timeout).await
}

async fn drop_all(kept: Vec<Kept>) {
    for entry in kept {
        let _ = entry.transport.close().await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn round_robin_fill(
    mut claims: Vec<HostClaim>,
    mut kept: Vec<Kept>,
    want: usize,
    lock_opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
    wait_timeout: Duration,
) -> Vec<HostClaim> {
    let deadline = Instant::now() + wait_timeout;

    while claims.len() < want && !kept.is_empty() {
        let mut still_locked = Vec::new();
        for mut entry in kept {
            if claims.len() >= want {
                still_locked.push(entry);
                continue;
            }
            match rr_lock::try_acquire(entry.transport.as_ref(), lock_opts, fingerprint, project_path, clock, local_host).await {
                Ok(handle) => claims.push(HostClaim { connection: entry.connection, transport: entry.transport, lock: Some(handle) }),
                Err(LockError::Locked(holder)) => {
                    entry.holder = holder.to_string();
                    still_locked.push(entry);
                }
                Err(err) => {
                    tracing::debug!(host = %entry.connection.host_name, error = %err, "connection died during wait");
                    let _ = entry.transport.close().await;
                }
            }
        }
        kept = still_locked;

        if kept.is_empty() || claims.len() >= want || Instant::now() >= deadline {
            break;
        }
        let sleep_for = WAIT_POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now()));
        tokio::time::sleep(sleep_for).await;
    }

    drop_all(kept).await;
    claims
}

#[cfg(test)]
#[path = "host_pool_tests.rs"]
mod tests;
