// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic `<taskname>` dispatch (`spec.md` §4.8, §6): task names are data
//! read from `Resolved.project.tasks`, never generated subcommands. A
//! `Run`/`Steps` task goes through the single-host Workflow pipeline; a
//! `Parallel` task goes through the Parallel Orchestrator, which already
//! knows how to flatten a one-name `parallel:[...]` reference.

use rr_config::{ConfigError, Resolved, TaskBody};

use crate::cli::CommonOpts;
use crate::exit_error::ExitError;
use crate::parallel_cmd::run_named_parallel;
use crate::run_cmd::run_single;

/// Runs the task named `name`, taken verbatim from an unrecognized
/// subcommand. Returns the same `ExitError` shape every other command
/// returns so `main` has one dispatch-to-exit-code path.
pub async fn dispatch_task(resolved: Resolved, opts: &CommonOpts, name: &str) -> Result<i32, ExitError> {
    let task = resolved
        .project
        .tasks
        .get(name)
        .ok_or_else(|| ExitError::from(&ConfigError::UnknownTask(name.to_string())))?
        .clone();

    match &task.body {
        TaskBody::Parallel { .. } => run_named_parallel(&resolved, name, &task, opts).await,
        TaskBody::Run { run } => {
            let command = shell_command(run.clone(), &task.env);
            run_single(resolved, opts, &command, opts.skip_sync).await
        }
        TaskBody::Steps { steps } => {
            let joined = steps.iter().map(|step| step.run.as_str()).collect::<Vec<_>>().join(" && ");
            let command = shell_command(joined, &task.env);
            run_single(resolved, opts, &command, opts.skip_sync).await
        }
    }
}

/// Prefixes `command` with this task's `env` assignments, mirroring
/// `rr_core::TaskInfo::shell_command` for tasks dispatched outside the
/// parallel worker (a single `Run`/`Steps` task never gets wrapped in a
/// `TaskInfo`, so it needs its own copy of the same quoting rule).
fn shell_command(command: String, env: &std::collections::HashMap<String, String>) -> String {
    if env.is_empty() {
        return command;
    }
    let mut keys: Vec<&String> = env.keys().collect();
    keys.sort();
    let mut prefix = String::new();
    for key in keys {
        prefix.push_str(&format!("{key}={} ", sh_quote(&env[key])));
    }
    format!("{prefix}{command}")
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
