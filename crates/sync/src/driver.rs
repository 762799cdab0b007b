// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync driver: delta-copy of a local working tree to a remote directory
//! (`spec.md` §4.4). The concrete rsync/ssh invocation is, per `spec.md`
//! §1, a capability interface — `rr-sync` defines the trait and a real
//! `rsync`-backed implementation; the hard scheduling logic in
//! `rr-workflow` only ever depends on [`SyncDriver`].

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::SyncError;
use crate::options::SyncOptions;

/// Outcome of a sync/pull invocation.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub dry_run: bool,
    /// Captured driver stdout when `dry_run` is set — the preview the
    /// caller renders instead of actually transferring anything.
    pub preview: Option<String>,
}

/// Callback invoked with each line of driver progress output as it
/// arrives, decoupling rendering from execution (`spec.md` §4.8's
/// renderer/worker split applies equally to a single sync phase:
/// `rr-workflow` chooses a progress-bar sink or a minimal spinner sink
/// depending on quiet mode and feeds it through this callback).
pub type ProgressSink<'a> = dyn FnMut(&str) + Send + 'a;

#[async_trait]
pub trait SyncDriver: Send + Sync {
    /// Copy `local_dir` to `<alias>:<remote_dir>`.
    async fn sync(
        &self,
        alias: &str,
        local_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError>;

    /// Reverse transfer: pull files matching `patterns` from
    /// `<alias>:<remote_dir>` into `dest_dir`.
    async fn pull(
        &self,
        alias: &str,
        patterns: &[String],
        dest_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError>;
}

/// Real driver: shells `rsync -e ssh` as a local subprocess (rsync opens
/// its own SSH connection to the alias; it does not ride the `Transport`
/// used for probing/locking/execution).
#[derive(Debug, Clone, Default)]
pub struct RsyncDriver;

const DRIVER: &str = "rsync";

impl RsyncDriver {
    async fn run(&self, args: Vec<String>, opts: &SyncOptions, progress: &mut ProgressSink<'_>) -> Result<SyncReport, SyncError> {
        let mut command = Command::new(DRIVER);
        command.args(&args);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        tracing::debug!(args = ?args, "invoking rsync");
        let mut child = command.spawn().map_err(|source| SyncError::Spawn { driver: DRIVER, source })?;

        let stdout = child.stdout.take().ok_or(SyncError::NoStdout { driver: DRIVER })?;
        let mut lines = BufReader::new(stdout).lines();
        let mut preview = String::new();
        while let Some(line) = lines.next_line().await? {
            if opts.dry_run {
                preview.push_str(&line);
                preview.push('\n');
            }
            progress(&line);
        }

        let status = child.wait().await?;
        if !status.success() {
            let mut stderr_buf = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                use tokio::io::AsyncReadExt;
                let _ = stderr.read_to_string(&mut stderr_buf).await;
            }
            return Err(SyncError::DriverFailed { driver: DRIVER, code: status.code().unwrap_or(-1), stderr_tail: stderr_buf });
        }

        Ok(SyncReport { dry_run: opts.dry_run, preview: opts.dry_run.then_some(preview) })
    }
}

#[async_trait]
impl SyncDriver for RsyncDriver {
    async fn sync(
        &self,
        alias: &str,
        local_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError> {
        let mut args = vec!["-az".to_string(), "-e".to_string(), "ssh".to_string()];
        args.extend(opts.driver_args());
        args.push(format!("{}/", local_dir.display()));
        args.push(format!("{alias}:{remote_dir}/"));
        self.run(args, opts, progress).await
    }

    async fn pull(
        &self,
        alias: &str,
        patterns: &[String],
        dest_dir: &Path,
        remote_dir: &str,
        opts: &SyncOptions,
        progress: &mut ProgressSink<'_>,
    ) -> Result<SyncReport, SyncError> {
        let mut args = vec!["-az".to_string(), "-e".to_string(), "ssh".to_string()];
        args.extend(opts.driver_args());
        for pattern in patterns {
            args.push(format!("{alias}:{remote_dir}/{pattern}"));
        }
        args.push(format!("{}/", dest_dir.display()));
        self.run(args, opts, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_args_place_dry_run_last() {
        let opts = SyncOptions { exclude: vec!["target/".into()], flags: vec![], dry_run: true };
        let mut args = vec!["-az".to_string(), "-e".to_string(), "ssh".to_string()];
        args.extend(opts.driver_args());
        assert_eq!(args.last(), Some(&"--verbose".to_string()));
    }
}
