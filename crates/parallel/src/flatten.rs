// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task graph flattening (`spec.md` §4.8): a `parallel:[...]` group may
//! reference other tasks, including other parallel groups, recursively.
//! Flattening expands that reference graph depth-first into an ordered,
//! duplicate-index-stabilized list of executable [`TaskInfo`]s, rejecting
//! cycles and missing names before any host is touched.

use std::collections::HashSet;

use indexmap::IndexMap;

use rr_config::{TaskBody, TaskDef};
use rr_core::{TaskConfig, TaskInfo};

use crate::error::ParallelError;

/// Flatten the members of a `parallel:[...]` reference list into executable
/// tasks, depth-first, preserving declaration order (`spec.md` §4.8).
pub fn flatten(tasks: &IndexMap<String, TaskDef>, names: &[String]) -> Result<Vec<TaskInfo>, ParallelError> {
    let mut out = Vec::new();
    let mut visiting = HashSet::new();
    for name in names {
        expand(tasks, name, &mut visiting, &mut out)?;
    }
    Ok(out)
}

fn expand(
    tasks: &IndexMap<String, TaskDef>,
    name: &str,
    visiting: &mut HashSet<String>,
    out: &mut Vec<TaskInfo>,
) -> Result<(), ParallelError> {
    let def = tasks.get(name).ok_or_else(|| ParallelError::UnknownTask(name.to_string()))?;

    match &def.body {
        TaskBody::Parallel { parallel } => {
            if !visiting.insert(name.to_string()) {
                return Err(ParallelError::Cycle(name.to_string()));
            }
            for child in parallel {
                expand(tasks, child, visiting, out)?;
            }
            visiting.remove(name);
        }
        TaskBody::Run { run } => {
            out.push(task_info(name, run.clone(), def));
        }
        TaskBody::Steps { steps } => {
            let command = steps.iter().map(|step| step.run.as_str()).collect::<Vec<_>>().join(" && ");
            out.push(task_info(name, command, def));
        }
    }
    Ok(())
}

fn task_info(name: &str, command: String, def: &TaskDef) -> TaskInfo {
    let index = 0; // reassigned by `reindex` once the full list is known.
    let mut info = TaskInfo::new(name, index, command);
    info.env = def.env.clone();
    info.config = TaskConfig { hosts: def.hosts.clone(), timeout: def.timeout() };
    info
}

/// Assign the final, stable indices once every reference in the group has
/// been expanded. Kept as a separate pass so `expand`'s recursion doesn't
/// need a shared mutable counter threaded through every call.
pub fn reindex(mut tasks: Vec<TaskInfo>) -> Vec<TaskInfo> {
    for (i, task) in tasks.iter_mut().enumerate() {
        task.index = i;
    }
    tasks
}

/// Flatten and reindex in one call — the entry point the orchestrator uses.
pub fn flatten_group(tasks: &IndexMap<String, TaskDef>, names: &[String]) -> Result<Vec<TaskInfo>, ParallelError> {
    Ok(reindex(flatten(tasks, names)?))
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
