//! Connection: the result of successfully probing one alias of a [`Host`]
//! (`spec.md` §3).

use std::time::Duration;

use crate::host::HostName;

/// A live (or synthetic local) connection to a host. Opened by the
/// Selector, owned by the Workflow, closed on Workflow teardown.
#[derive(Debug, Clone)]
pub struct Connection {
    pub host_name: HostName,
    pub alias: String,
    pub latency: Duration,
    pub is_local: bool,
    pub remote_dir: String,
}

impl Connection {
    /// The synthetic connection returned when local fallback kicks in:
    /// no alias was reachable (or fallback was forced), and the workflow
    /// should run the command in the local working directory instead.
    pub fn local(cwd: impl Into<String>) -> Self {
        Self {
            host_name: HostName::new("local"),
            alias: "local".to_string(),
            latency: Duration::ZERO,
            is_local: true,
            remote_dir: cwd.into(),
        }
    }

    pub fn remote(host_name: HostName, alias: impl Into<String>, latency: Duration, remote_dir: impl Into<String>) -> Self {
        Self { host_name, alias: alias.into(), latency, is_local: false, remote_dir: remote_dir.into() }
    }
}
