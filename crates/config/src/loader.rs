// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML loader for global + project config (`spec.md` §6).
//!
//! This is deliberately a thin layer: `spec.md` §1 marks the configuration
//! loader and its file formats as an external collaborator, interface only.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::global::GlobalConfig;
use crate::project::ProjectConfig;
use crate::resolved::Resolved;

/// Load a [`GlobalConfig`] from `path`. If the file does not exist and
/// `allow_missing` is set, returns an empty default config (callers decide
/// whether that is fatal per `spec.md` §4.6 step 1).
pub fn load_global(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    parse_global(&text, path)
}

pub fn parse_global(text: &str, path: &Path) -> Result<GlobalConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::InvalidSchema { path: path.to_path_buf(), source: Box::new(source) })
}

/// Load a [`ProjectConfig`] from `path`. A missing project config file is
/// not an error — it just means "no project-specific overrides", and the
/// caller falls back to global defaults.
pub fn load_project(path: &Path) -> Result<ProjectConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_project(&text, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ProjectConfig::default()),
        Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
    }
}

pub fn parse_project(text: &str, path: &Path) -> Result<ProjectConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::InvalidSchema { path: path.to_path_buf(), source: Box::new(source) })
}

/// Full resolution: load both files, validate the "no config and no
/// hosts" failure, and assemble a [`Resolved`] value.
pub fn resolve(
    global_path: &Path,
    project_path: &Path,
    project_root: PathBuf,
    cwd: PathBuf,
) -> Result<Resolved, ConfigError> {
    let global = match std::fs::read_to_string(global_path) {
        Ok(text) => parse_global(&text, global_path)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => GlobalConfig::default(),
        Err(source) => return Err(ConfigError::Read { path: global_path.to_path_buf(), source }),
    };
    let project = load_project(project_path)?;

    if global.hosts.is_empty() {
        return Err(ConfigError::MissingConfig(global_path.to_path_buf()));
    }

    Ok(Resolved { global, project, project_root, cwd })
}

/// `spec.md` §4.9 / §9.4.6 step 1: `--local` and `--tag` are mutually
/// exclusive, checked before any network I/O.
pub fn check_flag_conflict(local: bool, tag: &Option<String>) -> Result<(), ConfigError> {
    if local && tag.is_some() {
        return Err(ConfigError::ConflictingFlags);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_global_with_no_hosts_is_fatal() {
        let global = write_temp("version = 1\n");
        let project_path = PathBuf::from("/nonexistent/project.toml");
        let err = resolve(global.path(), &project_path, PathBuf::from("/tmp/proj"), PathBuf::from("/tmp/proj"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingConfig(_)));
    }

    #[test]
    fn resolves_with_hosts_present() {
        let global = write_temp(
            r#"
            version = 1
            [hosts.dev]
            ssh = ["dev.example"]
            dir = "/tmp"
            "#,
        );
        let project_path = PathBuf::from("/nonexistent/project.toml");
        let resolved = resolve(global.path(), &project_path, PathBuf::from("/tmp/proj"), PathBuf::from("/tmp/proj")).unwrap();
        assert_eq!(resolved.global.hosts.len(), 1);
        assert!(resolved.project.tasks.is_empty());
    }

    #[test]
    fn flag_conflict_detected() {
        assert!(check_flag_conflict(true, &Some("gpu".to_string())).is_err());
        assert!(check_flag_conflict(true, &None).is_ok());
        assert!(check_flag_conflict(false, &Some("gpu".to_string())).is_ok());
    }
}
