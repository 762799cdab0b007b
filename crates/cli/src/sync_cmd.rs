// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sync` and `pull` (`spec.md` §6). Both reuse `setup_workflow` to pick a
//! host, but `pull` forces `skip_sync` so no forward copy happens before
//! the reverse transfer it actually asked for.

use rr_config::Resolved;
use rr_core::SystemClock;
use rr_selector::SshProber;
use rr_sync::{RsyncDriver, SyncDriver, SyncOptions};
use rr_workflow::{setup_workflow, SshDialer, WorkflowDeps};

use crate::cli::CommonOpts;
use crate::exit_error::ExitError;
use crate::run_cmd::workflow_options;

/// `rr sync`: `setup_workflow` already performs the sync phase as part of
/// host setup (`spec.md` §4.6 step 7), so this just runs setup and reports
/// the outcome.
pub async fn run_sync(resolved: Resolved, opts: &CommonOpts) -> Result<i32, ExitError> {
    let clock = SystemClock;
    let driver = RsyncDriver;
    let deps = WorkflowDeps { prober: SshProber, dialer: SshDialer, sync_driver: &driver, clock: &clock };

    let mut sink = |line: &str| {
        if !opts.quiet {
            println!("{line}");
        }
    };
    let wf_opts = workflow_options(opts, false);
    let context = setup_workflow(resolved, wf_opts, deps, &mut sink).await.map_err(|err| ExitError::from(&err))?;
    let host_label = if context.connection.is_local { "local".to_string() } else { context.connection.host_name.to_string() };
    context.close().await.ok();

    if !opts.quiet {
        println!("Synced to {host_label}");
    }
    Ok(0)
}

/// `rr pull <patterns...>`: connects (and locks, unless `--skip-lock`) but
/// skips the forward sync, then pulls `patterns` back from the remote
/// working directory into the local one.
pub async fn run_pull(resolved: Resolved, opts: &CommonOpts, patterns: &[String]) -> Result<i32, ExitError> {
    let clock = SystemClock;
    let driver = RsyncDriver;
    let deps = WorkflowDeps { prober: SshProber, dialer: SshDialer, sync_driver: &driver, clock: &clock };

    let mut no_progress = |_line: &str| {};
    let wf_opts = workflow_options(opts, true);
    let sync_opts = SyncOptions { exclude: resolved.project.sync.exclude.clone(), flags: resolved.project.sync.flags.clone(), dry_run: opts.dry_run };
    let local_dir = resolved.working_dir(None);
    let context = setup_workflow(resolved, wf_opts, deps, &mut no_progress).await.map_err(|err| ExitError::from(&err))?;

    if context.connection.is_local {
        context.close().await.ok();
        return Err(ExitError::new(2, "pull has nothing to do against a local connection"));
    }

    let host_label = context.connection.host_name.to_string();
    let pull_result = driver.pull(&context.connection.alias, patterns, &local_dir, &context.connection.remote_dir, &sync_opts, &mut no_progress).await;
    context.close().await.ok();

    match pull_result {
        Ok(report) => {
            if let Some(preview) = report.preview {
                print!("{preview}");
            }
            println!("Pulled {} pattern(s) from {host_label}", patterns.len());
            Ok(0)
        }
        Err(err) => Err(ExitError::new(1, format!("pull failed: {err}"))),
    }
}
