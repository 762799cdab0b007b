// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration error taxonomy (`spec.md` §7: Config kind).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file found at {0} and no global hosts configured")]
    MissingConfig(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("invalid config at {path}: {source}")]
    InvalidSchema { path: PathBuf, #[source] source: Box<toml::de::Error> },

    #[error("unknown host `{0}` referenced in project config")]
    UnknownHost(String),

    #[error("--local and --tag are mutually exclusive")]
    ConflictingFlags,

    #[error("unknown task `{0}`")]
    UnknownTask(String),
}
