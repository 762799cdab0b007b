// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel run configuration (`spec.md` §4.8).

use std::path::PathBuf;
use std::time::Duration;

use rr_core::OutputMode;

/// Upper safety cap on worker count regardless of host/task count
/// (`spec.md` §4.8: "an upper safety cap").
const MAX_WORKER_SAFETY_CAP: usize = 32;

#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// `<= 0` means "derive from host/task count" (`spec.md` §4.8).
    pub max_parallel: i64,
    pub fail_fast: bool,
    pub output_mode: OutputMode,
    pub save_logs: bool,
    pub log_dir: PathBuf,
    /// Command run once per host before that host's worker starts pulling
    /// tasks from the queue.
    pub setup: Option<String>,
    pub timeout: Option<Duration>,
    pub wait_timeout: Duration,
    /// Run-scoped flags that apply uniformly whether the group runs on one
    /// host or many (`spec.md` §6, §4.9): `--skip-sync`, `--skip-lock`,
    /// `--dry-run`, `--probe-timeout`.
    pub skip_sync: bool,
    pub skip_lock: bool,
    pub dry_run: bool,
    pub probe_timeout: Option<Duration>,
}

impl ParallelConfig {
    /// Effective worker count for `host_count` reachable hosts and
    /// `task_count` flattened tasks.
    pub fn worker_count(&self, host_count: usize, task_count: usize) -> usize {
        let requested = if self.max_parallel <= 0 {
            host_count.min(task_count).max(1)
        } else {
            self.max_parallel as usize
        };
        requested.min(MAX_WORKER_SAFETY_CAP).min(host_count.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_parallel: i64) -> ParallelConfig {
        ParallelConfig {
            max_parallel,
            fail_fast: false,
            output_mode: OutputMode::Progress,
            save_logs: false,
            log_dir: PathBuf::from("/tmp"),
            setup: None,
            timeout: None,
            wait_timeout: Duration::from_secs(60),
            skip_sync: false,
            skip_lock: false,
            dry_run: false,
            probe_timeout: None,
        }
    }

    #[test]
    fn zero_or_negative_derives_from_min_of_hosts_and_tasks() {
        assert_eq!(config(0).worker_count(3, 5), 3);
        assert_eq!(config(-1).worker_count(5, 2), 2);
    }

    #[test]
    fn explicit_value_is_capped_by_host_count() {
        assert_eq!(config(10).worker_count(2, 50), 2);
    }

    #[test]
    fn safety_cap_applies_regardless_of_requested_value() {
        assert_eq!(config(1000).worker_count(1000, 1000), MAX_WORKER_SAFETY_CAP);
    }
}
