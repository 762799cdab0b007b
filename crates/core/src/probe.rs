//! Probe result and failure classification (`spec.md` §3, §4.1, §7).

use std::time::Duration;

/// Why a probe of an SSH alias failed. Drives a specific human-facing
/// suggestion (`spec.md` §7) — never present a failure to the user without
/// going through [`FailureReason::suggestion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Refused,
    Unreachable,
    Auth,
    HostKey,
    Dns,
    ConnReset,
    Unknown,
}

impl FailureReason {
    /// One-line, reason-specific remediation suggestion.
    pub fn suggestion(&self, detail: &FailureDetail) -> String {
        match self {
            FailureReason::Timeout => {
                format!("try `ping {}` to check basic reachability", detail.alias)
            }
            FailureReason::Refused => {
                format!("nothing is listening on the SSH port for `{}` — is the host up?", detail.alias)
            }
            FailureReason::Unreachable => {
                format!("no route to `{}` — check VPN/network connectivity", detail.alias)
            }
            FailureReason::Auth => "run `ssh-add` to load your key into the agent".to_string(),
            FailureReason::HostKey => match (&detail.received_key_type, &detail.expected_key_types) {
                (Some(received), expected) if !expected.is_empty() => format!(
                    "host key mismatch: received {received}, expected one of {}; run `ssh-keyscan {}` to refresh known_hosts",
                    expected.join(", "),
                    detail.alias,
                ),
                _ => format!("host key rejected; run `ssh-keyscan {}` to refresh known_hosts", detail.alias),
            },
            FailureReason::Dns => format!("could not resolve `{}` — check the alias or /etc/hosts", detail.alias),
            FailureReason::ConnReset => "connection reset mid-handshake — the network or host is flaky, retry".to_string(),
            FailureReason::Unknown => "unexpected failure; rerun with RUST_LOG=debug for details".to_string(),
        }
    }
}

/// Extra context for rendering a [`FailureReason`] into a suggestion.
#[derive(Debug, Clone, Default)]
pub struct FailureDetail {
    pub alias: String,
    pub message: String,
    pub received_key_type: Option<String>,
    pub expected_key_types: Vec<String>,
}

/// Outcome of probing a single SSH alias. Immutable; accumulated across a
/// Selector scan.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub alias: String,
    pub success: bool,
    pub latency: Duration,
    pub failure_reason: Option<FailureReason>,
    pub detail: Option<FailureDetail>,
}

impl ProbeResult {
    pub fn ok(alias: impl Into<String>, latency: Duration) -> Self {
        Self { alias: alias.into(), success: true, latency, failure_reason: None, detail: None }
    }

    pub fn failed(alias: impl Into<String>, reason: FailureReason, detail: FailureDetail) -> Self {
        Self {
            alias: alias.into(),
            success: false,
            latency: Duration::ZERO,
            failure_reason: Some(reason),
            detail: Some(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_key_suggestion_names_received_type() {
        let detail = FailureDetail {
            alias: "dev.example".into(),
            message: String::new(),
            received_key_type: Some("ED25519".into()),
            expected_key_types: vec!["RSA".into()],
        };
        let suggestion = FailureReason::HostKey.suggestion(&detail);
        assert!(suggestion.contains("ED25519"));
        assert!(suggestion.contains("ssh-keyscan dev.example"));
    }

    #[test]
    fn timeout_suggestion_mentions_ping() {
        let detail = FailureDetail { alias: "dev.example".into(), ..Default::default() };
        assert!(FailureReason::Timeout.suggestion(&detail).contains("ping dev.example"));
    }

    #[test]
    fn auth_suggestion_mentions_ssh_add() {
        let detail = FailureDetail::default();
        assert!(FailureReason::Auth.suggestion(&detail).contains("ssh-add"));
    }
}
