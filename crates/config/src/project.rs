// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration shape (`spec.md` §6): host references plus
//! `sync`/`lock`/`tasks` blocks.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rr_core::OutputMode;

/// Project-level config, conventionally `.rr/config.toml` at the project root.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub tasks: IndexMap<String, TaskDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

/// Lock tunables. §9's Open Question notes the repo reads the round-robin
/// wait interval and overall `wait_timeout` inconsistently; we resolve that
/// here by making both configurable with the documented defaults (2s poll,
/// 60s overall) — see `DESIGN.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_lock_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default)]
    pub dir: Option<String>,
}

impl LockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn stale(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_lock_timeout_secs(),
            stale_secs: default_stale_secs(),
            wait_timeout_secs: default_wait_timeout_secs(),
            dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lock_timeout_secs() -> u64 {
    30
}

fn default_stale_secs() -> u64 {
    3600
}

fn default_wait_timeout_secs() -> u64 {
    60
}

/// A single step within a `steps:[{name,run}…]` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub name: Option<String>,
    pub run: String,
}

/// Output rendering mode as read from config/CLI, convertible to
/// `rr_core::OutputMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOutput {
    Progress,
    Stream,
    Verbose,
    Quiet,
}

impl From<TaskOutput> for OutputMode {
    fn from(value: TaskOutput) -> Self {
        match value {
            TaskOutput::Progress => OutputMode::Progress,
            TaskOutput::Stream => OutputMode::Stream,
            TaskOutput::Verbose => OutputMode::Verbose,
            TaskOutput::Quiet => OutputMode::Quiet,
        }
    }
}

/// The body of a task: a single command, an ordered list of steps, or a
/// reference to other tasks to run in parallel (`spec.md` §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskBody {
    Run { run: String },
    Steps { steps: Vec<Step> },
    Parallel { parallel: Vec<String> },
}

/// One entry under `[tasks.<name>]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDef {
    #[serde(flatten)]
    pub body: TaskBody,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub output: Option<TaskOutput>,
    #[serde(default)]
    pub fail_fast: Option<bool>,
    #[serde(default)]
    pub max_parallel: Option<i64>,
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl TaskDef {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
