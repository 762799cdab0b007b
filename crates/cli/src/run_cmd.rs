// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a single command through the Workflow engine's Connect → Lock →
//! Sync → Execute → Release pipeline (`spec.md` §4.6) and renders the
//! result to the terminal. Shared by `run`, `exec`, and any `<taskname>`
//! whose body is a plain command or a `steps` list.

use indicatif::{ProgressBar, ProgressStyle};
use rr_config::Resolved;
use rr_core::{OutputMode, SystemClock};
use rr_selector::SshProber;
use rr_sync::RsyncDriver;
use rr_workflow::{setup_workflow, SshDialer, WorkflowDeps, WorkflowOptions};

use crate::cli::CommonOpts;
use crate::exit_error::ExitError;
use crate::tail_sink::{tail_to_string, TailSink};

const STDERR_TAIL_CAP: usize = 4096;

pub fn workflow_options(opts: &CommonOpts, skip_sync_forced: bool) -> WorkflowOptions {
    WorkflowOptions {
        host: opts.host.clone(),
        tag: opts.tag.clone(),
        local: opts.local,
        probe_timeout: opts.probe_timeout(),
        skip_sync: opts.skip_sync || skip_sync_forced,
        skip_lock: opts.skip_lock,
        dry_run: opts.dry_run,
        working_dir_override: None,
    }
}

/// A progress-bar sink in any non-quiet mode, a no-op sink in quiet mode
/// (`spec.md` §4.6 step 7).
fn progress_sink(mode: OutputMode) -> (Box<dyn FnMut(&str) + Send>, Option<ProgressBar>) {
    if matches!(mode, OutputMode::Quiet) {
        return (Box::new(|_line: &str| {}), None);
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} syncing: {msg}") {
        bar.set_style(style);
    }
    let handle = bar.clone();
    (Box::new(move |line: &str| handle.set_message(line.to_string())), Some(bar))
}

/// Runs `command` against whatever host `setup_workflow` selects, then
/// closes the workflow context. Returns the remote command's exit code —
/// the caller uses it verbatim as the process exit code for a single-host
/// run (`spec.md` §6).
pub async fn run_single(resolved: Resolved, opts: &CommonOpts, command: &str, skip_sync_forced: bool) -> Result<i32, ExitError> {
    let clock = SystemClock;
    let driver = RsyncDriver;
    let deps = WorkflowDeps { prober: SshProber, dialer: SshDialer, sync_driver: &driver, clock: &clock };

    let (mut sink, bar) = progress_sink(opts.output_mode());
    let wf_opts = workflow_options(opts, skip_sync_forced);
    let context = setup_workflow(resolved, wf_opts, deps, &mut sink).await.map_err(|err| ExitError::from(&err))?;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let host_label = if context.connection.is_local { "local".to_string() } else { context.connection.host_name.to_string() };

    let mut out = TailSink::new(tokio::io::stdout(), STDERR_TAIL_CAP);
    let mut err = TailSink::new(tokio::io::stderr(), STDERR_TAIL_CAP);
    let err_tail = err.tail_handle();

    let exec_result = context.transport.exec_stream(command, &mut out, &mut err).await;
    context.close().await.ok();

    let exit_code = match exec_result {
        Ok(code) => code,
        Err(transport_err) => return Err(ExitError::new(1, format!("command execution failed: {transport_err}"))),
    };

    if exit_code == 0 {
        println!("Completed on {host_label}");
    } else {
        let tail = tail_to_string(&err_tail);
        eprintln!("Command exited {exit_code} on {host_label}");
        if let Some(suggestion) = rr_workflow::exit::exit_code_suggestion(exit_code) {
            eprintln!("  hint: {suggestion}");
        }
        if rr_workflow::exit::looks_like_missing_tool(exit_code, &tail) {
            eprintln!("  it looks like a required tool is missing on {host_label} — install it there and retry");
        }
    }

    Ok(exit_code)
}
