// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote mkdir-based lock (`spec.md` §4.3): exclusive resource for the
//! pair `(Host, project-fingerprint)`, using directory-create as the
//! atomic primitive.

use std::time::{Duration, Instant};

use rr_core::{Clock, ProjectFingerprint};
use rr_ssh::{exec_capture, Transport};

use crate::error::LockError;
use crate::holder::Holder;

/// A lock is considered stale regardless of PID liveness once its age
/// exceeds `stale` by this multiple (`spec.md` §4.3: "age exceeds
/// `cfg.stale` by a wide margin regardless").
const WIDE_STALE_MARGIN: u64 = 10;

/// Poll interval cap for the blocking `acquire` loop (`spec.md` §4.3).
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Tunables for lock acquisition, mirroring `rr_config::LockConfig` but
/// kept independent so `rr-lock` has no dependency on `rr-config`.
#[derive(Debug, Clone)]
pub struct LockOptions {
    pub base_dir: String,
    pub timeout: Duration,
    pub stale: Duration,
}

/// A held lock: the directory that proves exclusivity, who holds it, and
/// when it was acquired. `release`/`force_release` take the `Transport` the
/// lock was acquired on — the handle itself holds only the directory path,
/// never closing the connection it rides on (`spec.md` §9).
#[derive(Debug, Clone)]
pub struct LockHandle {
    pub dir: String,
    pub holder: Holder,
    pub acquired_at: u64,
}

pub fn lock_dir(base_dir: &str, fingerprint: ProjectFingerprint) -> String {
    format!("{}/{}", base_dir.trim_end_matches('/'), fingerprint.lock_dir_name())
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Non-blocking acquire: `mkdir` is the atomicity guarantee. Returns
/// `LockError::Locked` (carrying the holder, when readable) if another
/// caller already holds it and the lock is not stale.
pub async fn try_acquire(
    transport: &dyn Transport,
    opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
) -> Result<LockHandle, LockError> {
    let dir = lock_dir(&opts.base_dir, fingerprint);
    let mkdir_cmd = format!("mkdir {} 2>&1", sh_quote(&dir));

    if exec_capture(transport, &mkdir_cmd).await?.exit_code == 0 {
        return claim(transport, dir, project_path, clock).await;
    }

    let existing = read_holder(transport, &dir).await;
    if let Some(holder) = &existing {
        if is_stale(holder, clock.epoch_secs(), opts.stale, local_host).await {
            force_release(transport, &dir).await?;
            if exec_capture(transport, &mkdir_cmd).await?.exit_code == 0 {
                return claim(transport, dir, project_path, clock).await;
            }
        }
    }

    Err(LockError::Locked(existing.unwrap_or(Holder {
        user: "unknown".to_string(),
        host: "unknown".to_string(),
        pid: 0,
        project: project_path.to_string(),
        ts: 0,
    })))
}

async fn claim(transport: &dyn Transport, dir: String, project_path: &str, clock: &dyn Clock) -> Result<LockHandle, LockError> {
    let now = clock.epoch_secs();
    let holder = Holder::current(project_path, now);
    write_holder(transport, &dir, &holder).await?;
    Ok(LockHandle { dir, holder, acquired_at: now })
}

/// Blocking acquire, up to `opts.timeout`. Polls with exponential backoff
/// capped at [`MAX_BACKOFF`]; each attempt re-checks staleness through
/// [`try_acquire`].
pub async fn acquire(
    transport: &dyn Transport,
    opts: &LockOptions,
    fingerprint: ProjectFingerprint,
    project_path: &str,
    clock: &dyn Clock,
    local_host: &str,
) -> Result<LockHandle, LockError> {
    let deadline = Instant::now() + opts.timeout;
    let mut backoff = Duration::from_millis(100);

    loop {
        match try_acquire(transport, opts, fingerprint, project_path, clock, local_host).await {
            Ok(handle) => return Ok(handle),
            Err(LockError::Locked(holder)) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(LockError::Timeout(opts.timeout));
                }
                tracing::debug!(holder = %holder, "lock held, backing off");
                let sleep_for = backoff.min(deadline - now);
                tokio::time::sleep(sleep_for).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(other) => return Err(other),
        }
    }
}

/// Best-effort read of the holder file; `"unknown"` if anything goes wrong.
pub async fn get_lock_holder(transport: &dyn Transport, opts: &LockOptions, fingerprint: ProjectFingerprint) -> String {
    let dir = lock_dir(&opts.base_dir, fingerprint);
    match read_holder(transport, &dir).await {
        Some(holder) => holder.to_string(),
        None => "unknown".to_string(),
    }
}

pub async fn is_locked(transport: &dyn Transport, opts: &LockOptions, fingerprint: ProjectFingerprint) -> bool {
    let dir = lock_dir(&opts.base_dir, fingerprint);
    let cmd = format!("test -d {}", sh_quote(&dir));
    matches!(exec_capture(transport, &cmd).await, Ok(result) if result.exit_code == 0)
}

/// Removes the lock directory. Idempotent; errors are the caller's to log,
/// never fatal (`spec.md` §4.3, §7).
pub async fn release(transport: &dyn Transport, handle: &LockHandle) -> Result<(), LockError> {
    force_release(transport, &handle.dir).await
}

/// Breaks a lock unconditionally.
pub async fn force_release(transport: &dyn Transport, dir: &str) -> Result<(), LockError> {
    let cmd = format!("rm -rf {}", sh_quote(dir));
    let result = exec_capture(transport, &cmd).await?;
    if result.exit_code != 0 {
        return Err(LockError::ForceReleaseFailed(dir.to_string()));
    }
    Ok(())
}

async fn write_holder(transport: &dyn Transport, dir: &str, holder: &Holder) -> Result<(), LockError> {
    let path = format!("{dir}/holder");
    let heredoc = format!("cat > {} <<'RR_LOCK_EOF'\n{}RR_LOCK_EOF\n", sh_quote(&path), holder.to_file_contents());
    let result = exec_capture(transport, &heredoc).await?;
    if result.exit_code != 0 {
        return Err(LockError::Other(format!("failed writing holder file at {path}: {}", result.stderr)));
    }
    Ok(())
}

async fn read_holder(transport: &dyn Transport, dir: &str) -> Option<Holder> {
    let path = format!("{dir}/holder");
    let cmd = format!("cat {} 2>/dev/null", sh_quote(&path));
    let result = exec_capture(transport, &cmd).await.ok()?;
    if result.exit_code != 0 {
        return None;
    }
    Holder::parse(&result.stdout)
}

/// `holder.pid`/`holder.host` (`Holder::current`) always describe the
/// *local* machine that ran `rr` and wrote the lock file — never the
/// remote host the lock lives on (`crates/ssh` has no visibility into a
/// remote process table at all). So `holder.host == local_host` means "the
/// rr process that wrote this lock ran on this same machine", and the only
/// process table we can ever check is our own, via a local `kill -0` —
/// never one shelled through the remote `Transport` the lock itself lives
/// on.
async fn is_stale(holder: &Holder, now: u64, stale: Duration, local_host: &str) -> bool {
    let age = now.saturating_sub(holder.ts);
    if age > stale.as_secs().saturating_mul(WIDE_STALE_MARGIN) {
        return true;
    }
    if age <= stale.as_secs() {
        return false;
    }
    if holder.host != local_host {
        // The lock was written by an `rr` invocation on a different
        // machine; there is no process table we can check, so trust the
        // timestamp alone (`spec.md` §9 Open Question).
        return false;
    }
    !pid_alive(holder.pid).await
}

/// Checks whether `pid` is still alive on *this* machine, via a local
/// `kill -0` (no remote I/O — see [`is_stale`]).
async fn pid_alive(pid: u32) -> bool {
    match tokio::process::Command::new("kill").arg("-0").arg(pid.to_string()).output().await {
        Ok(output) => output.status.success(),
        Err(_) => true,
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
