// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rr-parallel: the Parallel Orchestrator for `parallel:[...]` task groups
//! (`spec.md` §4.8) — flattens the task reference graph, hands hosts to a
//! pool of workers using the §4.7 load-balanced discipline, and lets idle
//! workers steal tasks from a shared queue until it drains or a fail-fast
//! cancellation trips.

pub mod config;
pub mod error;
pub mod event;
pub mod flatten;
pub mod host_pool;
pub mod log_writer;
pub mod orchestrator;
pub mod queue;
pub mod renderer;
pub mod worker;

pub use config::ParallelConfig;
pub use error::ParallelError;
pub use event::TaskEvent;
pub use flatten::flatten_group;
pub use host_pool::{acquire_worker_claims, HostClaim};
pub use orchestrator::{run_parallel, ParallelDeps};
pub use queue::TaskQueue;
