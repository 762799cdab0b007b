// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rr`: binary entry point. Parses the CLI surface (`spec.md` §6), loads
//! and resolves configuration, dispatches to the matching command, and
//! maps the result to a process exit code (`spec.md` §7).

mod cli;
mod color;
mod exit_error;
mod locate;
mod parallel_cmd;
mod run_cmd;
mod sync_cmd;
mod tail_sink;
mod task_dispatch;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::exit_error::ExitError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, ExitError> {
    rr_config::loader::check_flag_conflict(cli.opts.local, &cli.opts.tag).map_err(|err| ExitError::from(&err))?;

    let cwd = std::env::current_dir().map_err(|err| ExitError::new(1, format!("failed to read current directory: {err}")))?;
    let project_root = locate::find_project_root(&cwd);
    let project_path = locate::project_config_path(&project_root);
    let global_path = locate::global_config_path();

    let resolved = rr_config::loader::resolve(&global_path, &project_path, project_root, cwd).map_err(|err| ExitError::from(&err))?;

    match &cli.command {
        Command::Run { cmd } => run_cmd::run_single(resolved, &cli.opts, &cmd.join(" "), false).await,
        Command::Exec { cmd } => run_cmd::run_single(resolved, &cli.opts, &cmd.join(" "), true).await,
        Command::Sync => sync_cmd::run_sync(resolved, &cli.opts).await,
        Command::Pull { patterns } => sync_cmd::run_pull(resolved, &cli.opts, patterns).await,
        Command::Task(args) => {
            let name = args.first().ok_or_else(|| ExitError::new(2, "missing task name"))?;
            task_dispatch::dispatch_task(resolved, &cli.opts, name).await
        }
    }
}
