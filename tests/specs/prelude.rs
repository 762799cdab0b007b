// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for `tests/specs/**`: an isolated project directory, an
//! isolated `RR_CONFIG_DIR` (`rr`'s own config loader always requires at
//! least one configured host, even for `--local` runs — see
//! `rr_config::loader::resolve`), and a small fluent wrapper around
//! invoking the `rr` binary itself.

use std::ffi::OsStr;
use std::path::Path;

use assert_cmd::Command as AssertCommand;

const DEFAULT_GLOBAL: &str = r#"
    version = 1

    [hosts.local]
    ssh = ["local.example"]
    dir = "/srv/app"
"#;

/// An isolated project directory plus its own global config directory, so
/// a test never reads or writes a developer's real `~/.config/rr`.
pub struct Project {
    dir: tempfile::TempDir,
    config_dir: tempfile::TempDir,
}

impl Project {
    /// A project with the default single-host global config and no
    /// project-level `.rr/config.toml` of its own.
    pub fn empty() -> Self {
        Self::with_global(DEFAULT_GLOBAL)
    }

    /// A project whose global config file is exactly `global_toml`.
    pub fn with_global(global_toml: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(config_dir.path().join("config.toml"), global_toml).expect("write global config");
        Self { dir, config_dir }
    }

    /// Writes `contents` to `relative` (relative to the project root),
    /// creating parent directories as needed. Typically used for
    /// `.rr/config.toml`.
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Convenience for the common case: a project-level `.rr/config.toml`.
    pub fn project_config(&self, contents: &str) -> &Self {
        self.file(".rr/config.toml", contents)
    }

    /// An invocation rooted at this project's directory, reading this
    /// project's isolated global config.
    pub fn rr(&self) -> Invocation {
        let mut cmd = AssertCommand::cargo_bin("rr").expect("rr binary");
        cmd.current_dir(self.dir.path());
        cmd.env("RR_CONFIG_DIR", self.config_dir.path());
        cmd.env("NO_COLOR", "1");
        Invocation(cmd)
    }
}

/// A bare invocation with its own throwaway project fixture — enough for
/// `--help`/`--version`/usage-error tests that never need a project of
/// their own, while still keeping `RR_CONFIG_DIR` isolated.
pub fn cli() -> Invocation {
    Project::empty().rr()
}

/// A fluent wrapper around a single `rr` invocation, built for the
/// `cli().args(&[...]).passes().stdout_has(...)` chains these tests use.
pub struct Invocation(AssertCommand);

impl Invocation {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.0.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.0.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        let output = self.0.output().expect("failed to spawn rr");
        Run { output }
    }

    pub fn passes(self) -> Run {
        self.run().expect_success()
    }

    pub fn fails(self) -> Run {
        self.run().expect_failure()
    }
}

/// The captured result of a finished invocation.
pub struct Run {
    output: std::process::Output,
}

impl Run {
    fn expect_success(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            self.output.status,
            self.stdout_str(),
            self.stderr_str()
        );
        self
    }

    fn expect_failure(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected failure, got success\nstdout:\n{}\nstderr:\n{}",
            self.stdout_str(),
            self.stderr_str()
        );
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected), "stderr:\n{}", self.stderr_str());
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout_str().contains(needle), "expected stdout to contain {needle:?}, got:\n{}", self.stdout_str());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr_str().contains(needle), "expected stderr to contain {needle:?}, got:\n{}", self.stderr_str());
        self
    }

    fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }
}
