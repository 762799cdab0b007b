// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-code-to-suggestion mapping and missing-tool detection
//! (`spec.md` §4.6).

/// One-line contextual help for a non-zero exit code from the user's
/// command. Mirrors the table in `spec.md` §4.6 exactly.
pub fn exit_code_suggestion(code: i32) -> Option<&'static str> {
    match code {
        0 => None,
        1 => Some("command exited with a generic error"),
        2 => Some("command was misused (bad arguments/usage)"),
        126 => Some("command found but not executable — check permissions"),
        127 => Some("command not found — is it installed on this host?"),
        128 => Some("invalid exit code from the command"),
        130 => Some("interrupted (SIGINT, e.g. Ctrl-C)"),
        137 => Some("killed (SIGKILL) — likely out of memory"),
        139 => Some("segmentation fault (SIGSEGV)"),
        143 => Some("terminated (SIGTERM)"),
        n if n > 128 && n < 165 => Some("killed by a signal"),
        _ => Some("command exited non-zero"),
    }
}

/// `true` when a signal killed the command (exit code encodes `128 + signal`).
pub fn killed_by_signal(code: i32) -> Option<i32> {
    if code > 128 && code < 165 {
        Some(code - 128)
    } else {
        None
    }
}

const MISSING_TOOL_MARKERS: &[&str] = ["command not found", "not found", "no such file or directory"];

/// Missing-tool detection: either the exit code is the shell's canonical
/// 127, or the stderr tail matches a common "not found" phrasing
/// (`spec.md` §4.6). `stderr_tail` should already be bounded by the
/// caller (last N lines) — this never scans the whole buffer.
pub fn looks_like_missing_tool(exit_code: i32, stderr_tail: &str) -> bool {
    if exit_code == 127 {
        return true;
    }
    let lower = stderr_tail.to_lowercase();
    MISSING_TOOL_MARKERS.iter().any(|marker| lower.contains(marker))
}
