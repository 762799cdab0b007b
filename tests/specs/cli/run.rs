// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rr --local run <cmd>` and `rr --local exec <cmd>` specs (`spec.md`
//! §4.6, §6). `--local` sends the command through the real local
//! subprocess transport instead of SSH, so these exercise the live
//! Connect → Execute path end to end without a remote host.

use crate::prelude::*;

#[test]
fn local_run_executes_the_command_and_reports_the_host() {
    let project = Project::empty();

    project.rr().args(["--local", "run", "echo", "hello-from-rr"]).passes().stdout_has("hello-from-rr").stdout_has("Completed on local");
}

#[test]
fn local_exec_skips_sync_and_still_runs() {
    let project = Project::empty();

    project.rr().args(["--local", "exec", "echo", "no-sync-needed"]).passes().stdout_has("no-sync-needed");
}

#[test]
fn nonzero_exit_is_propagated_as_the_process_exit_code() {
    let project = Project::empty();

    project.rr().args(["--local", "run", "exit", "3"]).fails().code(3).stderr_has("exited 3");
}

#[test]
fn missing_tool_gets_a_127_exit_and_a_hint() {
    let project = Project::empty();

    project
        .rr()
        .args(["--local", "run", "definitely-not-a-real-binary-xyz"])
        .fails()
        .code(127)
        .stderr_has("command not found — is it installed on this host?");
}

#[test]
fn named_run_task_executes_via_local_flag() {
    let project = Project::empty();
    project.project_config(
        r#"
            [tasks.hello]
            run = "echo hello-from-task"
        "#,
    );

    project.rr().args(["--local", "hello"]).passes().stdout_has("hello-from-task");
}

#[test]
fn named_steps_task_runs_each_step_in_order() {
    let project = Project::empty();
    project.project_config(
        r#"
            [[tasks.build.steps]]
            run = "echo step-one"
            [[tasks.build.steps]]
            run = "echo step-two"
        "#,
    );

    project.rr().args(["--local", "build"]).passes().stdout_has("step-one").stdout_has("step-two");
}

#[test]
fn task_env_assignments_are_visible_to_the_command() {
    let project = Project::empty();
    project.project_config(
        r#"
            [tasks.greet]
            run = "printenv NAME"
            [tasks.greet.env]
            NAME = "world"
        "#,
    );

    // `printenv` reads its own process environment, so this only passes if
    // the env assignment actually lands there rather than being expanded
    // (or not) by the parent shell that builds the command line.
    project.rr().args(["--local", "greet"]).passes().stdout_has("world");
}
