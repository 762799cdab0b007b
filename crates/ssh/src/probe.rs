// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probe: test whether an SSH alias is reachable (`spec.md` §4.1).

use std::time::{Duration, Instant};

use openssh::{KnownHosts, SessionBuilder};

use rr_core::{FailureDetail, FailureReason, ProbeResult};

use crate::classify::classify_openssh_error;

const SENTINEL: &str = "rr-probe-ok";

#[derive(Debug, thiserror::Error)]
#[error("probe of `{alias}` failed: {reason:?} ({})", detail.message)]
pub struct ProbeError {
    pub alias: String,
    pub reason: FailureReason,
    pub detail: FailureDetail,
}

impl ProbeError {
    pub fn suggestion(&self) -> String {
        self.reason.suggestion(&self.detail)
    }
}

/// Establish an SSH session sufficient to prove liveness (connect, echo a
/// sentinel, close) and measure the round trip. On failure, returns a
/// classified [`ProbeError`].
pub async fn probe(alias: &str, timeout: Duration) -> Result<Duration, ProbeError> {
    let start = Instant::now();
    let connect = SessionBuilder::default().known_hosts_check(KnownHosts::Accept).connect_timeout(timeout);

    let result = tokio::time::timeout(timeout, async {
        let session = connect.connect(alias).await?;
        let output = session.command("echo").arg(SENTINEL).output().await?;
        session.close().await?;
        Ok::<_, openssh::Error>(output)
    })
    .await;

    match result {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.trim() == SENTINEL {
                Ok(start.elapsed())
            } else {
                let detail = FailureDetail { alias: alias.to_string(), message: "sentinel echo mismatch".into(), ..Default::default() };
                Err(ProbeError { alias: alias.to_string(), reason: FailureReason::Unknown, detail })
            }
        }
        Ok(Err(err)) => {
            let stderr_tail = String::new();
            let (reason, detail) = classify_openssh_error(&err, &stderr_tail, alias);
            Err(ProbeError { alias: alias.to_string(), reason, detail })
        }
        Err(_elapsed) => {
            let detail = FailureDetail { alias: alias.to_string(), message: format!("no response within {timeout:?}"), ..Default::default() };
            Err(ProbeError { alias: alias.to_string(), reason: FailureReason::Timeout, detail })
        }
    }
}

/// Convert a successful probe into a [`ProbeResult`].
pub fn ok_result(alias: &str, latency: Duration) -> ProbeResult {
    ProbeResult::ok(alias, latency)
}

/// Convert a failed probe into a [`ProbeResult`].
pub fn failed_result(err: &ProbeError) -> ProbeResult {
    ProbeResult::failed(err.alias.clone(), err.reason, err.detail.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_is_success() {
        let result = ok_result("dev.example", Duration::from_millis(5));
        assert!(result.success);
        assert_eq!(result.alias, "dev.example");
    }

    #[test]
    fn failed_result_carries_reason() {
        let err = ProbeError {
            alias: "dev.example".into(),
            reason: FailureReason::Timeout,
            detail: FailureDetail { alias: "dev.example".into(), ..Default::default() },
        };
        let result = failed_result(&err);
        assert!(!result.success);
        assert_eq!(result.failure_reason, Some(FailureReason::Timeout));
    }
}
