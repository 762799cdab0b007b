// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination. Conversions
//! from each core crate's error taxonomy attach the exit code and
//! suggestion the Error Handling Design calls for (`spec.md` §7).

use std::fmt;

use rr_config::ConfigError;
use rr_parallel::ParallelError;
use rr_workflow::WorkflowError;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Misuse exit code (`spec.md` §4.6's table: `2` — bad arguments/usage).
const MISUSE: i32 = 2;
/// Generic fatal exit code, used for every other setup-phase failure.
const GENERIC: i32 = 1;

impl From<&ConfigError> for ExitError {
    fn from(err: &ConfigError) -> Self {
        let code = match err {
            ConfigError::ConflictingFlags | ConfigError::UnknownHost(_) | ConfigError::UnknownTask(_) => MISUSE,
            _ => GENERIC,
        };
        Self::new(code, err.to_string())
    }
}

impl From<&WorkflowError> for ExitError {
    fn from(err: &WorkflowError) -> Self {
        Self::new(GENERIC, err.to_string())
    }
}

impl From<&ParallelError> for ExitError {
    fn from(err: &ParallelError) -> Self {
        let code = match err {
            ParallelError::Cycle(_) | ParallelError::UnknownTask(_) => MISUSE,
            _ => GENERIC,
        };
        Self::new(code, err.to_string())
    }
}
