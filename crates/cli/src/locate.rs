// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finds the two config files `rr_config::loader::resolve` needs
//! (`spec.md` §1 marks "the configuration loader and its file formats" as
//! an external collaborator — this is that collaborator's filesystem
//! half: deciding *where* the files live, not how to parse them).

use std::path::{Path, PathBuf};

const PROJECT_CONFIG_REL: &str = ".rr/config.toml";
const GLOBAL_CONFIG_SUBDIR: &str = "rr";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Walk up from `start` looking for a `.rr/config.toml`. Returns the
/// directory that contains it (the project root) or `start` itself if
/// none is found anywhere above it — in which case `rr_config::resolve`
/// will simply see no project config and fall back to global defaults.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut dir = start;
    loop {
        if dir.join(PROJECT_CONFIG_REL).is_file() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return start.to_path_buf(),
        }
    }
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_REL)
}

/// Resolve the global config directory: `RR_CONFIG_DIR` > `dirs::config_dir()`
/// > the system temp dir. `~/.config/rr/config.toml` on a typical Linux box.
pub fn global_config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("RR_CONFIG_DIR") {
        return PathBuf::from(dir).join(GLOBAL_CONFIG_FILE);
    }
    dirs::config_dir().unwrap_or_else(std::env::temp_dir).join(GLOBAL_CONFIG_SUBDIR).join(GLOBAL_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_project_root_from_nested_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".rr")).unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_REL), "").unwrap();
        let nested = dir.path().join("src").join("nested");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), dir.path());
    }

    #[test]
    fn falls_back_to_start_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_project_root(dir.path()), dir.path());
    }

    #[test]
    #[serial_test::serial(rr_config_dir_env)]
    fn rr_config_dir_env_var_overrides_the_default_location() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("RR_CONFIG_DIR", dir.path());

        let path = global_config_path();

        std::env::remove_var("RR_CONFIG_DIR");
        assert_eq!(path, dir.path().join(GLOBAL_CONFIG_FILE));
    }
}
