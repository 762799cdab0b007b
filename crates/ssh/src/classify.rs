// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure classification (`spec.md` §4.1): turn an `openssh::Error` (plus
//! a bounded stderr tail) into a [`FailureReason`] + [`FailureDetail`].
//!
//! Classification prefers structural inspection of the underlying
//! `io::ErrorKind` first; string matching on the error message / stderr
//! tail is the documented last resort for cases `ssh` only communicates
//! through text (DNS failures, auth rejection, host-key mismatches).

use std::io;

use rr_core::{FailureDetail, FailureReason};

pub fn classify_openssh_error(err: &openssh::Error, stderr_tail: &str, alias: &str) -> (FailureReason, FailureDetail) {
    let message = err.to_string();
    let combined = format!("{message}\n{stderr_tail}");

    let reason = match err {
        openssh::Error::Disconnected => FailureReason::ConnReset,
        openssh::Error::Connect(io_err) | openssh::Error::Master(io_err) => classify_io_error(io_err, &combined),
        openssh::Error::Ssh(_) | openssh::Error::Remote(_) => classify_by_text(&combined),
    };

    let mut detail = FailureDetail { alias: alias.to_string(), message, ..Default::default() };
    if reason == FailureReason::HostKey {
        detail.received_key_type = extract_key_type(&combined, "key fingerprint is");
        detail.expected_key_types = extract_expected_key_types(&combined);
    }
    (reason, detail)
}

fn classify_io_error(err: &io::Error, text: &str) -> FailureReason {
    match err.kind() {
        io::ErrorKind::TimedOut => FailureReason::Timeout,
        io::ErrorKind::ConnectionRefused => FailureReason::Refused,
        io::ErrorKind::ConnectionReset => FailureReason::ConnReset,
        io::ErrorKind::NotFound => FailureReason::Dns,
        _ => classify_by_text(text),
    }
}

fn classify_by_text(text: &str) -> FailureReason {
    let lower = text.to_lowercase();
    if lower.contains("could not resolve") || lower.contains("name or service not known") {
        FailureReason::Dns
    } else if lower.contains("host key verification failed") || lower.contains("remote host identification has changed") {
        FailureReason::HostKey
    } else if lower.contains("permission denied") || lower.contains("authentication failed") {
        FailureReason::Auth
    } else if lower.contains("connection refused") {
        FailureReason::Refused
    } else if lower.contains("network is unreachable") || lower.contains("no route to host") {
        FailureReason::Unreachable
    } else if lower.contains("connection timed out") || lower.contains("operation timed out") {
        FailureReason::Timeout
    } else if lower.contains("connection reset") {
        FailureReason::ConnReset
    } else {
        FailureReason::Unknown
    }
}

fn extract_key_type(text: &str, _marker: &str) -> Option<String> {
    for candidate in ["ED25519", "ECDSA", "RSA", "DSA"] {
        if text.to_uppercase().contains(candidate) {
            return Some(candidate.to_string());
        }
    }
    None
}

fn extract_expected_key_types(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for candidate in ["ED25519", "ECDSA", "RSA", "DSA"] {
        if text.to_uppercase().matches(candidate).count() > 0 {
            found.push(candidate.to_string());
        }
    }
    found
}
