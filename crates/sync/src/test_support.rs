// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake [`SyncDriver`] for tests in downstream crates (`rr-workflow`,
//! `rr-parallel`) that need to exercise the sync phase without shelling
//! out to a real `rsync`. Mirrors `rr-ssh::test_support::FakeTransport`.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::driver::{ProgressSink, SyncDriver, SyncReport};
use crate::error::SyncError;
use crate::options::SyncOptions;

/// One recorded `sync`/`pull` invocation, for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub alias: String,
    pub remote_dir: String,
    pub pull_patterns: Vec<String>,
    pub dry_run: bool,
}

/// A `SyncDriver` that never touches the filesystem or network: records
/// every call and returns a canned result, optionally failing.
#[derive(Default)]
pub struct FakeSyncDriver {
    calls: Mutex<Vec<RecordedCall>>,
    fail_with: Mutex<Option<String>>,
}

impl FakeSyncDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self, stderr_tail: impl Into<String>) -> Self {
        *self.fail_with.lock() = Some(stderr_tail.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn record(&self, alias: &str, remote_dir: &str, pull_patterns: &[String], opts: &SyncOptions) -> Result<SyncReport, SyncError> {
        self.calls.lock().push(RecordedCall {
            alias: alias.to_string(),
            remote_dir: remote_dir.to_string(),
            pull_patterns: pull_patterns.to_vec(),
            dry_run: opts.dry_run,
        });
        if let Some(stderr_tail) = self.fail_with.lock().clone() {
            return Err(SyncError::DriverFailed { driver: "fake", code: 1, stderr_tail });
        }
        Ok(SyncReport { dry_run: opts.dry_run, preview: opts.dry_run.then(|| "fake preview".to_string()) })
    }
}

#[async_trait]
impl SyncDriver for FakeSyncDriver {
    async fn sync(
        &self,
        alias: &str,
        _local_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        _progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError> {
        self.record(alias, remote_dir, &[], opts)
    }

    async fn pull(
        &self,
        alias: &str,
        patterns: &[String],
        _dest_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        _progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError> {
        self.record(alias, remote_dir, patterns, opts)
    }
}
