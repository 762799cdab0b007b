// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `setup_workflow`: the single entry point for the command workflow
//! (`spec.md` §4.6). Strict phase order: Load & validate → Working dir →
//! Selector setup → strategy choice → Connect → Lock → Sync.

use std::path::PathBuf;
use std::time::Duration;

use rr_config::{loader, Resolved};
use rr_core::Clock;
use rr_lock::LockOptions;
use rr_selector::Prober;
use rr_sync::{ProgressSink, SyncDriver, SyncOptions};

use crate::balanced::setup_balanced;
use crate::context::WorkflowContext;
use crate::dialer::Dialer;
use crate::error::WorkflowError;
use crate::selector_setup::build_selector;

/// CLI-facing options that shape workflow setup (`spec.md` §4.9).
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    pub host: Option<String>,
    pub tag: Option<String>,
    pub local: bool,
    pub probe_timeout: Option<Duration>,
    pub skip_sync: bool,
    pub skip_lock: bool,
    pub dry_run: bool,
    pub working_dir_override: Option<PathBuf>,
}

const DEFAULT_LOCK_BASE_DIR: &str = "/tmp/rr-locks";

/// Dependencies injected so setup is testable without a real SSH fleet or
/// wall clock. `sync_driver` is borrowed because the orchestrator layer
/// reuses one driver across many workflow setups.
pub struct WorkflowDeps<'a, P: Prober, D: Dialer, S: SyncDriver> {
    pub prober: P,
    pub dialer: D,
    pub sync_driver: &'a S,
    pub clock: &'a dyn Clock,
}

pub async fn setup_workflow<P: Prober, D: Dialer, S: SyncDriver>(
    resolved: Resolved,
    opts: WorkflowOptions,
    deps: WorkflowDeps<'_, P, D, S>,
    progress: &mut ProgressSink<'_>,
) -> Result<WorkflowContext, WorkflowError> {
    // 1. Load & validate.
    loader::check_flag_conflict(opts.local, &opts.tag)?;

    // 2. Working dir resolution.
    let working_dir = resolved.working_dir(opts.working_dir_override.as_deref());
    let fingerprint = resolved.fingerprint();
    let lock_enabled = !opts.skip_lock && resolved.project.lock.enabled;
    let lock_opts = LockOptions {
        base_dir: resolved.project.lock.dir.clone().unwrap_or_else(|| DEFAULT_LOCK_BASE_DIR.to_string()),
        timeout: resolved.project.lock.timeout(),
        stale: resolved.project.lock.stale(),
    };
    let local_host = whoami::hostname();

    if opts.local {
        let conn = rr_core::Connection::local(working_dir.display().to_string());
        let timeout = opts.probe_timeout.unwrap_or_else(|| resolved.global.defaults.probe_timeout());
        let transport = deps.dialer.dial(&conn, timeout).await?;
        return Ok(WorkflowContext::new(resolved, conn, None, transport, working_dir));
    }

    // 3. Selector setup.
    let (selector, candidates, timeout) = build_selector(&resolved, &working_dir, deps.prober, opts.probe_timeout)?;

    let project_path = resolved.project_root.display().to_string();

    // 4. Strategy choice.
    let single_host = opts.host.is_some() || opts.tag.is_some() || candidates.len() <= 1;

    let (connection, transport, lock) = if single_host {
        // 5. Connect.
        let connection = if let Some(tag) = &opts.tag {
            selector.select_by_tag(tag).await?
        } else {
            selector.select(opts.host.as_deref()).await?
        };
        let transport = deps.dialer.dial(&connection, timeout).await?;

        // 6. Lock.
        let lock = if lock_enabled && !connection.is_local {
            Some(rr_lock::acquire(transport.as_ref(), &lock_opts, fingerprint, &project_path, deps.clock, &local_host).await?)
        } else {
            None
        };
        (connection, transport, lock)
    } else {
        let outcome = setup_balanced(
            &selector,
            &deps.dialer,
            &candidates,
            lock_enabled,
            &lock_opts,
            fingerprint,
            &project_path,
            deps.clock,
            &local_host,
            timeout,
            resolved.project.lock.wait_timeout(),
        )
        .await?;
        (outcome.connection, outcome.transport, outcome.lock)
    };

    // 7. Sync.
    if !connection.is_local && !opts.skip_sync {
        let sync_opts = SyncOptions { exclude: resolved.project.sync.exclude.clone(), flags: resolved.project.sync.flags.clone(), dry_run: opts.dry_run };
        deps.sync_driver.sync(&connection.alias, &working_dir, &connection.remote_dir, &sync_opts, progress).await?;
    }

    Ok(WorkflowContext::new(resolved, connection, lock, transport, working_dir))
}

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;
