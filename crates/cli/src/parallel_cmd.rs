// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatches a named `parallel:[...]` task through the Parallel
//! Orchestrator (`spec.md` §4.8) and renders its run summary.

use std::path::PathBuf;
use std::sync::Arc;

use rr_config::{ProjectConfig, Resolved, TaskDef};
use rr_core::SystemClock;
use rr_parallel::{run_parallel, ParallelConfig, ParallelDeps};
use rr_selector::SshProber;
use rr_sync::RsyncDriver;
use rr_workflow::SshDialer;

use crate::cli::CommonOpts;
use crate::exit_error::ExitError;

fn build_config(task: &TaskDef, project: &ProjectConfig, log_dir: &str, opts: &CommonOpts) -> ParallelConfig {
    ParallelConfig {
        max_parallel: opts.max_parallel.or(task.max_parallel).unwrap_or(0),
        fail_fast: opts.fail_fast || task.fail_fast.unwrap_or(false),
        output_mode: task.output.map(Into::into).unwrap_or_else(|| opts.output_mode()),
        save_logs: !opts.no_logs,
        log_dir: PathBuf::from(log_dir),
        setup: task.setup.clone(),
        timeout: task.timeout(),
        wait_timeout: project.lock.wait_timeout(),
        skip_sync: opts.skip_sync,
        skip_lock: opts.skip_lock,
        dry_run: opts.dry_run,
        probe_timeout: opts.probe_timeout(),
    }
}

/// Runs the named task (already known to be a `parallel:[...]` group)
/// across the available hosts and prints a per-task summary. Returns `1`
/// if any task failed, `0` otherwise (`spec.md` §6).
pub async fn run_named_parallel(resolved: &Resolved, name: &str, task: &TaskDef, opts: &CommonOpts) -> Result<i32, ExitError> {
    let config = build_config(task, &resolved.project, &resolved.global.logs.dir, opts);

    let clock = SystemClock;
    let sync_driver: Arc<dyn rr_sync::SyncDriver> = Arc::new(RsyncDriver);
    let deps = ParallelDeps { prober: SshProber, dialer: SshDialer, sync_driver, clock: &clock };

    let working_dir = resolved.working_dir(None);
    let result = run_parallel(resolved, name, &[name.to_string()], &working_dir, config, deps).await.map_err(|err| ExitError::from(&err))?;

    for record in &result.records {
        println!("[{}] {:?} on {} (exit {})", record.name, record.status, record.host, record.exit_code);
    }
    println!("{} passed, {} failed", result.passed_count(), result.failed_count());

    Ok(result.exit_code())
}
