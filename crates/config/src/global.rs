// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global configuration shape (`spec.md` §6): `{ version, hosts, defaults, logs }`.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rr_core::HostName;

/// Top-level global config file, conventionally `~/.config/rr/config.toml`.
///
/// `hosts` is an [`IndexMap`] rather than a [`HashMap`] because the
/// Selector's priority order and the tag filter both depend on iterating
/// hosts in declaration order (`spec.md` §8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub version: u32,
    #[serde(default)]
    pub hosts: IndexMap<String, HostDef>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub logs: LogsConfig,
}

impl GlobalConfig {
    pub fn host_order(&self) -> Vec<HostName> {
        self.hosts.keys().map(|name| HostName::new(name.clone())).collect()
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { version: 1, hosts: IndexMap::new(), defaults: Defaults::default(), logs: LogsConfig::default() }
    }
}

/// One entry under `[hosts.<name>]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostDef {
    pub ssh: Vec<String>,
    pub dir: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub require: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_local_fallback")]
    pub local_fallback: bool,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Defaults {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self { host: None, local_fallback: default_local_fallback(), probe_timeout_secs: default_probe_timeout_secs() }
    }
}

fn default_local_fallback() -> bool {
    false
}

fn default_probe_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_keep_runs")]
    pub keep_runs: u32,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { dir: default_log_dir(), keep_runs: default_keep_runs() }
    }
}

fn default_log_dir() -> String {
    ".rr/logs".to_string()
}

fn default_keep_runs() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_global_config() {
        let toml = r#"
            version = 1

            [hosts.dev]
            ssh = ["dev.example"]
            dir = "${HOME}/code/${PROJECT}"
        "#;
        let cfg: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.hosts["dev"].ssh, vec!["dev.example".to_string()]);
        assert_eq!(cfg.defaults.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn host_order_matches_declaration_order() {
        let toml = r#"
            version = 1
            [hosts.b]
            ssh = ["b.ex"]
            dir = "/tmp"
            [hosts.a]
            ssh = ["a.ex"]
            dir = "/tmp"
        "#;
        let cfg: GlobalConfig = toml::from_str(toml).unwrap();
        let order: Vec<String> = cfg.host_order().iter().map(|h| h.to_string()).collect();
        assert_eq!(order, vec!["b".to_string(), "a".to_string()]);
    }
}
