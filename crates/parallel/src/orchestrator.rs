// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `run_parallel`: the single entry point for a `parallel:[...]` task
//! group (`spec.md` §4.8), tying together flattening, host acquisition,
//! the work-stealing queue, the worker pool, and the renderer.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use parking_lot::Mutex;
use rr_config::Resolved;
use rr_core::{Clock, RunResult, TaskRecord};
use rr_lock::LockOptions;
use rr_selector::Prober;
use rr_sync::{SyncDriver, SyncOptions};
use rr_workflow::{build_selector, Dialer};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ParallelConfig;
use crate::error::ParallelError;
use crate::flatten::flatten_group;
use crate::host_pool::acquire_worker_claims;
use crate::log_writer;
use crate::queue::TaskQueue;
use crate::renderer::render;
use crate::worker::{build_run_result, run_worker};

const DEFAULT_LOCK_BASE_DIR: &str = "/tmp/rr-locks";

/// Dependencies injected so a run is testable without a real SSH fleet or
/// wall clock. `sync_driver` is `Arc`-wrapped (unlike `WorkflowDeps`'s
/// borrowed driver) because each worker owns its copy across the
/// `tokio::spawn` boundary (`spec.md` §4.8: "worker tasks spawned with
/// `tokio::spawn`").
pub struct ParallelDeps<'a, P: Prober, D: Dialer> {
    pub prober: P,
    pub dialer: D,
    pub sync_driver: Arc<dyn SyncDriver>,
    pub clock: &'a dyn Clock,
}

/// Runs every task named in `task_names` (already expanded from any
/// `parallel:[...]` references by the caller's config lookup) across as
/// many hosts as `config.max_parallel` derives, and returns the aggregate
/// [`RunResult`] once every worker has drained the queue or been
/// cancelled.
pub async fn run_parallel<P, D>(
    resolved: &Resolved,
    group_name: &str,
    task_names: &[String],
    working_dir: &Path,
    config: ParallelConfig,
    deps: ParallelDeps<'_, P, D>,
) -> Result<RunResult, ParallelError>
where
    P: Prober,
    D: Dialer,
{
    let tasks = flatten_group(&resolved.project.tasks, task_names)?;
    if tasks.is_empty() {
        return Ok(RunResult::new());
    }

    let (selector, candidates, dial_timeout) = build_selector(resolved, working_dir, deps.prober, config.probe_timeout)?;

    let want = config.worker_count(candidates.len().max(1), tasks.len());
    let lock_enabled = !config.skip_lock && resolved.project.lock.enabled;
    let lock_opts = LockOptions {
        base_dir: resolved.project.lock.dir.clone().unwrap_or_else(|| DEFAULT_LOCK_BASE_DIR.to_string()),
        timeout: resolved.project.lock.timeout(),
        stale: resolved.project.lock.stale(),
    };
    let fingerprint = resolved.fingerprint();
    let project_path = resolved.project_root.display().to_string();
    let local_host = whoami::hostname();

    let claims = acquire_worker_claims(
        &selector,
        &deps.dialer,
        &candidates,
        want,
        lock_enabled,
        &lock_opts,
        fingerprint,
        &project_path,
        deps.clock,
        &local_host,
        dial_timeout,
        config.wait_timeout,
    )
    .await;

    if claims.is_empty() {
        return Err(ParallelError::NoHostsAvailable);
    }

    let run_dir = log_writer::run_dir(&config.log_dir, group_name, deps.clock.epoch_secs());

    let queue = TaskQueue::new(tasks);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let results = Arc::new(Mutex::new(Vec::<TaskRecord>::new()));
    let fail_fast_tripped = Arc::new(AtomicBool::new(false));
    let config = Arc::new(config);
    let sync_opts = SyncOptions { exclude: resolved.project.sync.exclude.clone(), flags: resolved.project.sync.flags.clone(), dry_run: config.dry_run };
    let sync_driver = (!config.skip_sync).then(|| deps.sync_driver.clone());

    let renderer = tokio::spawn(render(rx, config.output_mode));

    // A single process-level signal cancels every worker's shared token
    // (`spec.md` §4.8, §5): no new tasks are claimed once cancelled, and
    // in-flight tasks are asked to stop rather than awaited to completion.
    let signal_watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("received interrupt, cancelling in-flight tasks");
                cancel.cancel();
            }
        })
    };

    let mut workers = Vec::with_capacity(claims.len());
    for claim in claims {
        workers.push(tokio::spawn(run_worker(
            claim,
            working_dir.to_path_buf(),
            sync_driver.clone(),
            sync_opts.clone(),
            queue.clone(),
            config.clone(),
            cancel.clone(),
            tx.clone(),
            results.clone(),
            run_dir.clone(),
            fail_fast_tripped.clone(),
        )));
    }
    drop(tx);

    for worker in workers {
        if let Err(err) = worker.await {
            tracing::warn!(error = %err, "worker task panicked");
        }
    }
    signal_watcher.abort();
    let _ = renderer.await;

    let skipped = queue.drain().await;
    let records = Arc::try_unwrap(results).map(|m| m.into_inner()).unwrap_or_else(|arc| arc.lock().clone());
    let result = build_run_result(records, skipped);

    if config.save_logs {
        if let Err(err) = log_writer::write_summary(&run_dir, group_name, &result) {
            tracing::warn!(error = %err, "failed to write run summary");
        }
    }

    Ok(result)
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
