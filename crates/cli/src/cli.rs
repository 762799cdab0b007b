// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command line surface (`spec.md` §6): `run <cmd>`, `exec <cmd>`,
//! `sync`, `pull <patterns...>`, and dynamic `<taskname>`. Task names are
//! data loaded from `Resolved.project.tasks`, never generated subcommands
//! — an unrecognized subcommand is captured by clap's external-subcommand
//! mechanism and looked up at dispatch time.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::color;

#[derive(Parser, Debug)]
#[command(name = "rr", version, about = "Sync a working tree to a remote host, lock it, and run a command.", styles = color::styles())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub opts: CommonOpts,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync the working tree, then run a shell command on the chosen host.
    Run {
        #[arg(trailing_var_arg = true, required = true)]
        cmd: Vec<String>,
    },
    /// Run a shell command on the chosen host without syncing first.
    Exec {
        #[arg(trailing_var_arg = true, required = true)]
        cmd: Vec<String>,
    },
    /// Sync the working tree to the chosen host and stop.
    Sync,
    /// Pull files matching the given patterns back from the chosen host.
    Pull {
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Any other name is looked up in the project's `[tasks.*]` table.
    #[command(external_subcommand)]
    Task(Vec<String>),
}

/// Flags every subcommand accepts (`spec.md` §4.9, §6). `global = true`
/// lets them appear on either side of the subcommand, matching how most
/// `rr` invocations read (`rr --host dev run "make test"` and
/// `rr run "make test" --host dev` both work).
#[derive(Args, Debug, Clone, Default)]
pub struct CommonOpts {
    /// Target exactly one configured host by name.
    #[arg(long, global = true)]
    pub host: Option<String>,
    /// Restrict host selection to hosts carrying this tag.
    #[arg(long, global = true)]
    pub tag: Option<String>,
    /// Run locally instead of selecting a remote host. Mutually exclusive with `--tag`.
    #[arg(long, global = true)]
    pub local: bool,
    /// Override the per-alias probe timeout, in seconds.
    #[arg(long, global = true, value_name = "SECONDS")]
    pub probe_timeout: Option<u64>,
    /// Skip the working-tree sync phase.
    #[arg(long, global = true)]
    pub skip_sync: bool,
    /// Skip lock acquisition.
    #[arg(long, global = true)]
    pub skip_lock: bool,
    /// Preview the sync without transferring anything.
    #[arg(long, global = true)]
    pub dry_run: bool,
    /// Summary output only.
    #[arg(long, global = true)]
    pub quiet: bool,
    /// Interleave live output lines, prefixed by task name (parallel groups).
    #[arg(long, global = true)]
    pub stream: bool,
    /// Print full per-task output on completion (parallel groups).
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Cancel remaining tasks after the first failure (parallel groups).
    #[arg(long, global = true)]
    pub fail_fast: bool,
    /// Cap worker concurrency for a parallel group. `<= 0` derives it from host/task count.
    #[arg(long, global = true)]
    pub max_parallel: Option<i64>,
    /// Don't write per-task log files or a run summary.
    #[arg(long, global = true)]
    pub no_logs: bool,
}

impl CommonOpts {
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout.map(Duration::from_secs)
    }

    pub fn output_mode(&self) -> rr_core::OutputMode {
        if self.quiet {
            rr_core::OutputMode::Quiet
        } else if self.verbose {
            rr_core::OutputMode::Verbose
        } else if self.stream {
            rr_core::OutputMode::Stream
        } else {
            rr_core::OutputMode::Progress
        }
    }
}
