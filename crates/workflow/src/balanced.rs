// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load-balanced setup (`spec.md` §4.7): don't waste a sync on a host we
//! cannot lock. Tries every candidate host's Connection+Lock before
//! falling back to a round-robin wait on the ones that were merely
//! locked (not broken).

use std::time::{Duration, Instant};

use rr_core::{Clock, Connection, HostName, ProjectFingerprint};
use rr_lock::{LockError, LockHandle, LockOptions};
use rr_selector::{Prober, Selector};
use rr_ssh::Transport;

use crate::dialer::Dialer;
use crate::error::WorkflowError;

/// Round-robin wait interval between lock retries (`spec.md` §4.7).
const WAIT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct BalancedOutcome {
    pub connection: Connection,
    pub transport: Box<dyn Transport>,
    pub lock: Option<LockHandle>,
}

struct Kept {
    connection: Connection,
    transport: Box<dyn Transport>,
    holder: String,
}

#[allow(clippy::too_many_arguments)]
pub async fn setup_balanced<P: Prober, D: Dialer>(
    selector: &Selector<P>,
    dialer: &D,
    candidates: &[HostName],
    lock_enabled: bool,
    lock_opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
    dial_timeout: Duration,
    wait_timeout: Duration,
) -> Result<BalancedOutcome, WorkflowError> {
    let mut kept: Vec<Kept> = Vec::new();

    for name in candidates {
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
            close_all(kept).await;
            return Ok(BalancedOutcome { connection: conn, transport, lock: None });
        }

        match rr_lock::try_acquire(transport.as_ref(), lock_opts, fingerprint, project_path, clock, local_host).await {
            Ok(handle) => {
                close_all(kept).await;
                return Ok(BalancedOutcome { connection: conn, transport, lock: Some(handle) });
            }
            Err(LockError::Locked(holder)) => {
                kept.push(Kept { connection: conn, transport, holder: holder.to_string() });
            }
            Err(err) => {
                tracing::debug!(host = %name, error = %err, "lock attempt failed, dropping connection");
                let _ = transport.close().await;
            }
        }
    }

    if kept.is_empty() {
        return Err(WorkflowError::AllConnectionsDied);
    }

    if selector.local_fallback() {
        tracing::info!(locked_hosts = kept.len(), "every reachable host is locked, falling back to local execution");
        close_all(kept).await;
        let local = Connection::local(selector.local_dir().to_string());
        let transport = dialer.dial(&local, dial_timeout).await?;
        return Ok(BalancedOutcome { connection: local, transport, lock: None });
    }

    round_robin_wait(kept, lock_opts, fingerprint, project_path, clock, local_host, wait_timeout).await
}

async fn close_all(kept: Vec<Kept>) {
    for entry in kept {
        let _ = entry.transport.close().await;
    }
}

async fn round_robin_wait(
    mut kept: Vec<Kept>,
    lock_opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
    wait_timeout: Duration,
) -> Result<BalancedOutcome, WorkflowError> {
    let deadline = Instant::now() + wait_timeout;

    loop {
        let mut still_alive = Vec::new();
        for mut entry in kept {
            match rr_lock::try_acquire(entry.transport.as_ref(), lock_opts, fingerprint, project_path, clock, local_host).await {
                Ok(handle) => {
                    let connection = entry.connection;
                    let transport = entry.transport;
                    close_all(still_alive).await;
                    return Ok(BalancedOutcome { connection, transport, lock: Some(handle) });
                }
                Err(LockError::Locked(holder)) => {
                    entry.holder = holder.to_string();
                    still_alive.push(entry);
                }
                Err(err) => {
                    tracing::debug!(host = %entry.connection.host_name, error = %err, "connection died during wait");
                    let _ = entry.transport.close().await;
                }
            }
        }

        if still_alive.is_empty() {
            return Err(WorkflowError::AllConnectionsDied);
        }

        if Instant::now() >= deadline {
            let holders = still_alive.iter().map(|k| (k.connection.host_name.to_string(), k.holder.clone())).collect();
            close_all(still_alive).await;
            return Err(WorkflowError::AllHostsLocked { holders });
        }

        let sleep_for = WAIT_POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now()));
        tokio::time::sleep(sleep_for).await;
        kept = still_alive;
    }
}
