// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rr-sync: delta-copy of a working tree to a remote host and back
//! (`spec.md` §4.4).

pub mod driver;
pub mod error;
pub mod options;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use driver::{ProgressSink, RsyncDriver, SyncDriver, SyncReport};
pub use error::SyncError;
pub use options::SyncOptions;
