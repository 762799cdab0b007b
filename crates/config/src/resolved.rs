// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Resolved`: the single config value the core crates consume
//! (`spec.md` §6).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use rr_core::{Host, HostName, ProjectFingerprint};

use crate::error::ConfigError;
use crate::global::GlobalConfig;
use crate::project::ProjectConfig;

/// Combination of global + project config, plus the paths needed to
/// fingerprint the project and resolve the working directory.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub global: GlobalConfig,
    pub project: ProjectConfig,
    pub project_root: PathBuf,
    pub cwd: PathBuf,
}

impl Resolved {
    pub fn fingerprint(&self) -> ProjectFingerprint {
        ProjectFingerprint::of(&self.project_root)
    }

    /// Working dir resolution order from `spec.md` §4.6 step 2:
    /// explicit > resolved project root > process cwd.
    pub fn working_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map(Path::to_path_buf).unwrap_or_else(|| {
            if self.project_root.as_os_str().is_empty() {
                self.cwd.clone()
            } else {
                self.project_root.clone()
            }
        })
    }

    /// Every configured [`Host`], keyed by name, in declaration order.
    pub fn all_hosts(&self) -> Result<IndexMap<HostName, Host>, ConfigError> {
        let mut hosts = IndexMap::new();
        for (name, def) in &self.global.hosts {
            let host = Host::new(name.as_str(), def.ssh.clone(), def.dir.clone())
                .map_err(|_| ConfigError::UnknownHost(name.clone()))?
                .with_tags(def.tags.clone());
            hosts.insert(HostName::new(name.clone()), host);
        }
        Ok(hosts)
    }

    /// The host names this project restricts itself to, in order. Empty
    /// means "every global host, in global declaration order".
    pub fn candidate_host_names(&self) -> Result<Vec<HostName>, ConfigError> {
        if self.project.hosts.is_empty() {
            return Ok(self.global.host_order());
        }
        for name in &self.project.hosts {
            if !self.global.hosts.contains_key(name) {
                return Err(ConfigError::UnknownHost(name.clone()));
            }
        }
        Ok(self.project.hosts.iter().map(|n| HostName::new(n.clone())).collect())
    }
}
