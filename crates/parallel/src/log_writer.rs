// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task log files and the run summary manifest (`spec.md` §4.8, §6):
//! `<logs.dir>/<taskname>-<timestamp>/task-<index>-<name>.log` plus
//! `summary.json`, written with `serde_json`.

use std::path::{Path, PathBuf};

use rr_core::{RunResult, TaskRecord, TaskStatus};
use serde::Serialize;

use crate::error::ParallelError;

/// `<logs.dir>/<taskname>-<timestamp>` for a single run.
pub fn run_dir(log_dir: &Path, group_name: &str, timestamp: u64) -> PathBuf {
    log_dir.join(format!("{group_name}-{timestamp}"))
}

/// Writes one task's captured stdout+stderr to `task-<index>-<name>.log`
/// inside `dir`, returning the path written.
pub fn write_task_log(dir: &Path, index: usize, name: &str, stdout: &str, stderr: &str) -> Result<PathBuf, ParallelError> {
    std::fs::create_dir_all(dir).map_err(|source| ParallelError::LogWrite { path: dir.display().to_string(), source })?;
    let path = dir.join(format!("task-{index}-{name}.log"));
    let mut contents = String::new();
    if !stdout.is_empty() {
        contents.push_str("--- stdout ---\n");
        contents.push_str(stdout);
    }
    if !stderr.is_empty() {
        contents.push_str("--- stderr ---\n");
        contents.push_str(stderr);
    }
    std::fs::write(&path, contents).map_err(|source| ParallelError::LogWrite { path: path.display().to_string(), source })?;
    Ok(path)
}

#[derive(Debug, Serialize)]
struct SummaryRecord {
    name: String,
    index: usize,
    host: String,
    exit_code: i32,
    status: &'static str,
    elapsed_ms: u128,
    log_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    group: String,
    passed: usize,
    failed: usize,
    exit_code: i32,
    tasks: Vec<SummaryRecord>,
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Passed => "passed",
        TaskStatus::Failed => "failed",
        TaskStatus::Skipped => "skipped",
        TaskStatus::Cancelled => "cancelled",
    }
}

/// Writes `summary.json` once, after every task has completed or been
/// skipped (`spec.md` §5: "the summary is written once after all tasks
/// complete").
pub fn write_summary(dir: &Path, group_name: &str, result: &RunResult) -> Result<PathBuf, ParallelError> {
    std::fs::create_dir_all(dir).map_err(|source| ParallelError::SummaryWrite { path: dir.display().to_string(), source })?;
    let summary = Summary {
        group: group_name.to_string(),
        passed: result.passed_count(),
        failed: result.failed_count(),
        exit_code: result.exit_code(),
        tasks: result
            .records
            .iter()
            .map(|r: &TaskRecord| SummaryRecord {
                name: r.name.clone(),
                index: r.index,
                host: r.host.clone(),
                exit_code: r.exit_code,
                status: status_label(r.status),
                elapsed_ms: r.elapsed.as_millis(),
                log_path: r.log_path.clone(),
            })
            .collect(),
    };
    let path = dir.join("summary.json");
    let text = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&path, text).map_err(|source| ParallelError::SummaryWrite { path: path.display().to_string(), source })?;
    Ok(path)
}
