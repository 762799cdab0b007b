// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rr-ssh: probing and transport over SSH (`spec.md` §4.1, §4.2).

pub mod classify;
pub mod local;
pub mod probe;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use classify::classify_openssh_error;
pub use local::LocalTransport;
pub use probe::{probe, ProbeError};
pub use transport::{exec_capture, CaptureSink, CapturedOutput, OpensshTransport, Transport, TransportError};
