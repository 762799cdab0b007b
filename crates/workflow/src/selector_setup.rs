// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the [`Selector`] a `Resolved` config implies (`spec.md` §4.6
//! step 3). Shared between the single-command path (`crate::setup`) and
//! `rr-parallel`, which hands hosts to many workers using the same
//! priority order and substitutions.

use std::path::Path;
use std::time::Duration;

use rr_config::{ConfigError, Resolved};
use rr_core::HostName;
use rr_selector::{DirSubstitutions, Prober, Selector};

use crate::branch::current_branch;

fn project_name(project_root: &Path) -> String {
    project_root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "project".to_string())
}

/// Returns the configured [`Selector`], its candidate host order, and the
/// effective probe timeout (CLI override, else `defaults.probe_timeout`).
pub fn build_selector<P: Prober>(
    resolved: &Resolved,
    working_dir: &Path,
    prober: P,
    probe_timeout_override: Option<Duration>,
) -> Result<(Selector<P>, Vec<HostName>, Duration), ConfigError> {
    let all_hosts = resolved.all_hosts()?;
    let candidates = resolved.candidate_host_names()?;
    let substitutions = DirSubstitutions {
        project: project_name(&resolved.project_root),
        branch: current_branch(&resolved.project_root),
        user: whoami::username(),
        home: dirs::home_dir().map(|p| p.display().to_string()).unwrap_or_default(),
    };
    let mut selector = Selector::new(all_hosts, candidates.clone(), substitutions, working_dir.display().to_string(), prober);
    selector.set_local_fallback(resolved.global.defaults.local_fallback);
    let timeout = probe_timeout_override.unwrap_or_else(|| resolved.global.defaults.probe_timeout());
    selector.set_timeout(timeout);
    Ok((selector, candidates, timeout))
}
