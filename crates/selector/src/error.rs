// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selector error taxonomy (`spec.md` §4.5).

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("no hosts configured")]
    NoHosts,

    #[error("unknown host `{0}`")]
    UnknownHost(String),

    #[error("no host carries tag `{0}`")]
    UnknownTag(String),

    #[error("no reachable alias across {hosts} host(s) ({aliases} alias(es) attempted)")]
    AllFailed { hosts: usize, aliases: usize },
}
