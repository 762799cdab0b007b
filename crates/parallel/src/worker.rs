// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single worker: owns one [`HostClaim`] for the run's lifetime, runs
//! that host's `setup` command once, then pulls tasks from the shared
//! queue until it is drained or the run is cancelled (`spec.md` §4.8).

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rr_core::{OutputMode, RunResult, TaskRecord, TaskStatus};
use rr_ssh::Transport;
use rr_sync::{SyncDriver, SyncOptions};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::config::ParallelConfig;
use crate::event::TaskEvent;
use crate::host_pool::HostClaim;
use crate::log_writer;
use crate::queue::TaskQueue;

/// Appends every write to a shared buffer and — when set — forwards each
/// chunk as a `TaskEvent::Output` so `stream` mode can render output as it
/// arrives, decoupling capture (always on, for logs) from live rendering.
struct TeeSink {
    buffer: Arc<Mutex<Vec<u8>>>,
    live: Option<(UnboundedSender<TaskEvent>, String, usize)>,
}

impl AsyncWrite for TeeSink {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        self.buffer.lock().extend_from_slice(buf);
        if let Some((tx, name, index)) = &self.live {
            let line = String::from_utf8_lossy(buf).into_owned();
            let _ = tx.send(TaskEvent::Output { name: name.clone(), index: *index, line });
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn sink(events: Option<(UnboundedSender<TaskEvent>, String, usize)>) -> (TeeSink, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    (TeeSink { buffer: buffer.clone(), live: events }, buffer)
}

fn as_string(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8_lossy(&buffer.lock()).into_owned()
}

#[allow(clippy::too_many_arguments)]
pub async fn run_worker(
    claim: HostClaim,
    local_dir: std::path::PathBuf,
    sync_driver: Option<Arc<dyn SyncDriver>>,
    sync_opts: SyncOptions,
    queue: TaskQueue,
    config: Arc<ParallelConfig>,
    cancel: CancellationToken,
    events: UnboundedSender<TaskEvent>,
    results: Arc<Mutex<Vec<TaskRecord>>>,
    run_dir: std::path::PathBuf,
    fail_fast_tripped: Arc<std::sync::atomic::AtomicBool>,
) {
    let host_label = claim.label().to_string();

    if !claim.connection.is_local {
        if let Some(driver) = sync_driver {
            let mut no_progress = |_line: &str| {};
            let outcome = driver
                .sync(&claim.connection.alias, &local_dir, &claim.connection.remote_dir, &sync_opts, &mut no_progress)
                .await;
            if let Err(err) = outcome {
                tracing::warn!(host = %host_label, error = %err, "sync failed, worker will not run any tasks");
                claim.release().await;
                return;
            }
        }
    }

    if let Some(setup) = &config.setup {
        let (mut out, _) = sink(None);
        let (mut err, _) = sink(None);
        match claim.transport.exec_stream(setup, &mut out, &mut err).await {
            Ok(0) => {}
            Ok(code) => {
                tracing::warn!(host = %host_label, exit_code = code, "setup command failed, worker will not run any tasks");
                claim.release().await;
                return;
            }
            Err(err) => {
                tracing::warn!(host = %host_label, error = %err, "setup command errored, worker will not run any tasks");
                claim.release().await;
                return;
            }
        }
    }

    loop {
        if cancel.is_cancelled() {
            break;
        }
        let Some(task) = queue.claim(&host_label).await else { break };

        if fail_fast_tripped.load(std::sync::atomic::Ordering::SeqCst) {
            let _ = events.send(TaskEvent::Skipped { name: task.name.clone(), index: task.index });
            results.lock().push(TaskRecord {
                name: task.name,
                index: task.index,
                host: host_label.clone(),
                exit_code: -1,
                status: TaskStatus::Skipped,
                elapsed: Duration::ZERO,
                log_path: None,
            });
            continue;
        }

        let _ = events.send(TaskEvent::Started { name: task.name.clone(), index: task.index, host: host_label.clone() });

        let live = matches!(config.output_mode, OutputMode::Stream).then(|| (events.clone(), task.name.clone(), task.index));
        let (mut out, out_buf) = sink(live.clone());
        let (mut err, err_buf) = sink(live);

        let started = Instant::now();
        let deadline = task.config.timeout.or(config.timeout);
        let command = task.shell_command();
        let exec = claim.transport.exec_stream(&command, &mut out, &mut err);
        let timed = async {
            match deadline {
                Some(d) => tokio::time::timeout(d, exec).await.unwrap_or(Ok(124)),
                None => exec.await,
            }
        };

        // Best-effort cooperative cancellation (`spec.md` §4.8, §5): a
        // cancelled in-flight command is reported as `Cancelled` rather
        // than awaited to completion; the transport is closed right after
        // so the remote process at least loses its stdout/stderr pipes.
        let (exit_code, status, cancelled_mid_flight) = tokio::select! {
            biased;
            _ = cancel.cancelled() => (137, TaskStatus::Cancelled, true),
            outcome = timed => {
                let code = outcome.unwrap_or_else(|err| {
                    tracing::warn!(host = %host_label, task = %task.name, error = %err, "task execution errored");
                    1
                });
                let status = if code == 0 { TaskStatus::Passed } else { TaskStatus::Failed };
                (code, status, false)
            }
        };
        if cancelled_mid_flight {
            let _ = claim.transport.close().await;
        }

        let elapsed = started.elapsed();

        let log_path = if config.save_logs {
            match log_writer::write_task_log(&run_dir, task.index, &task.name, &as_string(&out_buf), &as_string(&err_buf)) {
                Ok(path) => Some(path.display().to_string()),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to write task log");
                    None
                }
            }
        } else {
            None
        };

        let _ = events.send(TaskEvent::Completed { name: task.name.clone(), index: task.index, host: host_label.clone(), status, exit_code });
        results.lock().push(TaskRecord { name: task.name, index: task.index, host: host_label.clone(), exit_code, status, elapsed, log_path });

        if status == TaskStatus::Failed && config.fail_fast {
            fail_fast_tripped.store(true, std::sync::atomic::Ordering::SeqCst);
            cancel.cancel();
        }
    }

    claim.release().await;
}

/// Builds a [`RunResult`] from every [`TaskRecord`] collected by the
/// workers plus `Skipped` records for anything left in the queue when the
/// run ended (`spec.md` §4.8: fail-fast "marks remaining tasks as
/// skipped").
pub fn build_run_result(mut records: Vec<TaskRecord>, skipped: Vec<rr_core::TaskInfo>) -> RunResult {
    for task in skipped {
        records.push(TaskRecord {
            name: task.name,
            index: task.index,
            host: String::new(),
            exit_code: -1,
            status: TaskStatus::Skipped,
            elapsed: Duration::ZERO,
            log_path: None,
        });
    }
    records.sort_by_key(|r| r.index);
    let mut result = RunResult::new();
    for record in records {
        result.push(record);
    }
    result
}
