//! rr-core: shared data model for the rr workflow engine.
//!
//! This crate holds the types every other `rr-*` crate agrees on: hosts,
//! connections, probe results, task descriptions, run results, and the
//! `Clock` abstraction used anywhere timing needs to be fake-able in tests.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod connection;
pub mod fingerprint;
pub mod host;
pub mod output;
pub mod probe;
pub mod run_result;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use connection::Connection;
pub use fingerprint::ProjectFingerprint;
pub use host::{Host, HostName};
pub use output::OutputMode;
pub use probe::{FailureDetail, FailureReason, ProbeResult};
pub use run_result::{RunResult, TaskRecord, TaskStatus};
pub use task::{TaskConfig, TaskInfo};
