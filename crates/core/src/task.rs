//! TaskInfo: a single executable unit within a parallel task group
//! (`spec.md` §3, §4.8).

use std::collections::HashMap;
use std::time::Duration;

/// Per-task execution knobs that can be set in the runbook or overridden
/// from the CLI.
#[derive(Debug, Clone, Default)]
pub struct TaskConfig {
    pub hosts: Vec<String>,
    pub timeout: Option<Duration>,
}

/// A single task, already resolved to a concrete command string. Immutable
/// once assembled. `index` disambiguates duplicate names in logs and is
/// assigned during flattening (`spec.md` §4.8).
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: String,
    pub index: usize,
    pub command: String,
    pub env: HashMap<String, String>,
    pub config: TaskConfig,
}

impl TaskInfo {
    pub fn new(name: impl Into<String>, index: usize, command: impl Into<String>) -> Self {
        Self { name: name.into(), index, command: command.into(), env: HashMap::new(), config: TaskConfig::default() }
    }

    /// Name used for log file and display purposes: `task-<index>-<name>`.
    pub fn log_stem(&self) -> String {
        format!("task-{}-{}", self.index, self.name)
    }

    /// `self.command`, prefixed with `KEY=value` assignments for every
    /// entry in `self.env`, in sorted key order so the rendered command is
    /// deterministic. A `Transport` runs this through `sh -c`, so a plain
    /// inline-assignment prefix is all `env` needs.
    pub fn shell_command(&self) -> String {
        if self.env.is_empty() {
            return self.command.clone();
        }
        let mut keys: Vec<&String> = self.env.keys().collect();
        keys.sort();
        let mut prefix = String::new();
        for key in keys {
            prefix.push_str(&format!("{key}={} ", sh_quote(&self.env[key])));
        }
        format!("{prefix}{}", self.command)
    }
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
