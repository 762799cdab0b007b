// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holder info: `user=…`, `host=…`, `pid=…`, `project=…`, `ts=…` lines
//! written into the lock directory's `holder` file (`spec.md` §6).

use std::fmt;

/// Who holds a lock, for display and staleness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub user: String,
    pub host: String,
    pub pid: u32,
    pub project: String,
    pub ts: u64,
}

impl Holder {
    /// Build a `Holder` describing the current process.
    pub fn current(project: impl Into<String>, ts: u64) -> Self {
        Self { user: whoami::username(), host: whoami::hostname(), pid: std::process::id(), project: project.into(), ts }
    }

    /// Render as the `holder` file's text contents.
    pub fn to_file_contents(&self) -> String {
        format!("user={}\nhost={}\npid={}\nproject={}\nts={}\n", self.user, self.host, self.pid, self.project, self.ts)
    }

    /// Parse `key=value` lines, tolerating unknown keys (`spec.md` §6:
    /// "parser must tolerate unknown keys").
    pub fn parse(text: &str) -> Option<Self> {
        let mut user = None;
        let mut host = None;
        let mut pid = None;
        let mut project = None;
        let mut ts = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else { continue };
            match key.trim() {
                "user" => user = Some(value.trim().to_string()),
                "host" => host = Some(value.trim().to_string()),
                "pid" => pid = value.trim().parse().ok(),
                "project" => project = Some(value.trim().to_string()),
                "ts" => ts = value.trim().parse().ok(),
                _ => continue,
            }
        }

        Some(Self { user: user?, host: host?, pid: pid?, project: project?, ts: ts? })
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} (pid {}, held since {})", self.user, self.host, self.pid, self.ts)
    }
}
