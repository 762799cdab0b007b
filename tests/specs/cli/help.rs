// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface specs (`spec.md` §6): help/usage/version output, and the
//! dynamic `<taskname>` dispatch rejecting an unknown task before any
//! network I/O.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn help_flag_shows_usage() {
    cli().args(["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn run_help_shows_usage() {
    cli().args(["run", "--help"]).passes().stdout_has("Usage:");
}

#[test]
fn version_flag_shows_version() {
    cli().args(["--version"]).passes().stdout_has("rr ");
}

#[test]
fn local_and_tag_together_is_rejected_before_any_io() {
    // `--tag` would otherwise require a reachable host to probe; the flag
    // conflict must be caught before that ever happens (`spec.md` §4.9).
    cli().args(["--local", "--tag", "gpu", "run", "echo", "hi"]).fails().code(2).stderr_has("mutually exclusive");
}

#[test]
fn unknown_task_name_fails_with_a_clear_message() {
    let project = Project::empty();

    project.rr().args(["does-not-exist"]).fails().code(2).stderr_has("unknown task");
}
