// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort `${BRANCH}` substitution for `dir_template` (`spec.md`
//! §3). Reads `.git/HEAD` directly rather than shelling out to `git`,
//! since this runs before any Connection exists.

use std::path::Path;

pub fn current_branch(project_root: &Path) -> String {
    let head_path = project_root.join(".git").join("HEAD");
    let Ok(contents) = std::fs::read_to_string(&head_path) else {
        return "main".to_string();
    };
    let trimmed = contents.trim();
    match trimmed.strip_prefix("ref: refs/heads/") {
        Some(branch) => branch.to_string(),
        None => "HEAD".to_string(),
    }
}
