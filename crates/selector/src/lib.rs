// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rr-selector: chooses a reachable alias per host, in priority order,
//! with tag filtering and local fallback (`spec.md` §4.5).

pub mod error;
pub mod event;
pub mod prober;
pub mod selector;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::SelectError;
pub use event::SelectEvent;
pub use prober::{Prober, SshProber};
pub use selector::{DirSubstitutions, HostDescriptor, Selector};
