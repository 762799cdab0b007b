// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake [`Prober`] for tests that need to exercise Selector iteration
//! without a real SSH fleet.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use rr_core::{FailureDetail, FailureReason};
use rr_ssh::ProbeError;

use crate::prober::Prober;

/// A `Prober` that resolves each alias against a canned outcome table and
/// records every alias it was asked to probe, in order.
#[derive(Default)]
pub struct FakeProber {
    outcomes: Mutex<Vec<(String, Result<Duration, FailureReason>)>>,
    history: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeding(self, alias: impl Into<String>, latency: Duration) -> Self {
        self.outcomes.lock().push((alias.into(), Ok(latency)));
        self
    }

    pub fn failing(self, alias: impl Into<String>, reason: FailureReason) -> Self {
        self.outcomes.lock().push((alias.into(), Err(reason)));
        self
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, alias: &str, _timeout: Duration) -> Result<Duration, ProbeError> {
        self.history.lock().push(alias.to_string());
        let outcomes = self.outcomes.lock();
        match outcomes.iter().find(|(name, _)| name == alias) {
            Some((_, Ok(latency))) => Ok(*latency),
            Some((_, Err(reason))) => {
                Err(ProbeError { alias: alias.to_string(), reason: *reason, detail: FailureDetail { alias: alias.to_string(), message: format!("{reason:?}"), ..Default::default() } })
            }
            None => Err(ProbeError {
                alias: alias.to_string(),
                reason: FailureReason::Unknown,
                detail: FailureDetail { alias: alias.to_string(), message: "no fake outcome registered".into(), ..Default::default() },
            }),
        }
    }
}
