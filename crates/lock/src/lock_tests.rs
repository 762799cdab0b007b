use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use rr_core::{Clock, FakeClock, ProjectFingerprint};
use rr_ssh::{Transport, TransportError};

use super::*;

/// A minimal virtual filesystem that interprets exactly the shell commands
/// `rr-lock` issues against the remote host (mkdir, cat > ... <<heredoc,
/// cat, rm -rf, test -d), so lock semantics can be tested without a real
/// SSH fleet. Holder-pid liveness is never part of this: `is_stale` checks
/// the local process table directly, so it is exercised with real pids
/// (this test process's own, and a spawned-and-reaped one) rather than
/// anything the fake transport simulates.
#[derive(Default)]
struct VirtualFsTransport {
    dirs: Mutex<HashSet<String>>,
    files: Mutex<HashMap<String, String>>,
}

impl VirtualFsTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Directly seeds a lock directory with `holder`'s file contents,
    /// bypassing `try_acquire`/`Holder::current` — those always record
    /// *this* process's own pid, which is unsuitable for exercising the
    /// dead-pid branch of `is_stale`.
    fn seed_holder(&self, dir: &str, holder: &Holder) {
        self.dirs.lock().insert(dir.to_string());
        self.files.lock().insert(format!("{dir}/holder"), holder.to_file_contents());
    }
}

fn extract_single_quoted(cmd: &str, after: &str) -> Option<String> {
    let start = cmd.find(after)? + after.len();
    let rest = &cmd[start..];
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].replace("'\\''", "'"))
}

#[async_trait]
impl Transport for VirtualFsTransport {
    async fn exec_stream(
        &self,
        cmd: &str,
        out: &mut (dyn AsyncWrite + Send + Unpin),
        err: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<i32, TransportError> {
        let (exit_code, stdout, stderr) = if let Some(rest) = cmd.strip_prefix("mkdir ") {
            let path = extract_single_quoted(rest, "").unwrap_or_default();
            let mut dirs = self.dirs.lock();
            if dirs.contains(&path) {
                (1, String::new(), "mkdir: File exists".to_string())
            } else {
                dirs.insert(path);
                (0, String::new(), String::new())
            }
        } else if cmd.starts_with("cat >") {
            let path = extract_single_quoted(cmd, "cat > ").unwrap();
            let marker_start = cmd.find("<<'RR_LOCK_EOF'\n").unwrap() + "<<'RR_LOCK_EOF'\n".len();
            let body = &cmd[marker_start..];
            let body = body.strip_suffix("RR_LOCK_EOF\n").unwrap_or(body);
            self.files.lock().insert(path, body.to_string());
            (0, String::new(), String::new())
        } else if let Some(rest) = cmd.strip_prefix("cat ") {
            let path = extract_single_quoted(rest, "").unwrap_or_default();
            match self.files.lock().get(&path) {
                Some(contents) => (0, contents.clone(), String::new()),
                None => (1, String::new(), "No such file".to_string()),
            }
        } else if let Some(rest) = cmd.strip_prefix("rm -rf ") {
            let path = extract_single_quoted(rest, "").unwrap_or_default();
            self.dirs.lock().remove(&path);
            self.files.lock().retain(|k, _| !k.starts_with(&path));
            (0, String::new(), String::new())
        } else if let Some(rest) = cmd.strip_prefix("test -d ") {
            let path = extract_single_quoted(rest, "").unwrap_or_default();
            if self.dirs.lock().contains(&path) {
                (0, String::new(), String::new())
            } else {
                (1, String::new(), String::new())
            }
        } else {
            (127, String::new(), format!("unrecognized command: {cmd}"))
        };

        out.write_all(stdout.as_bytes()).await?;
        err.write_all(stderr.as_bytes()).await?;
        Ok(exit_code)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn opts() -> LockOptions {
    LockOptions { base_dir: "/srv/locks".to_string(), timeout: Duration::from_millis(200), stale: Duration::from_secs(3600) }
}

#[tokio::test]
async fn try_acquire_succeeds_when_free() {
    let transport = VirtualFsTransport::new();
    let clock = FakeClock::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let handle = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await.unwrap();
    assert!(handle.dir.ends_with(".lock"));
}

#[tokio::test]
async fn second_try_acquire_sees_locked() {
    let transport = VirtualFsTransport::new();
    let clock = FakeClock::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let _first = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await.unwrap();
    let second = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await;
    assert!(matches!(second, Err(LockError::Locked(_))));
}

#[tokio::test]
async fn mutual_exclusion_holds_under_concurrency() {
    let transport = VirtualFsTransport::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let transport = transport.clone();
        handles.push(tokio::spawn(async move {
            let clock = FakeClock::new();
            try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await
        }));
    }

    let mut successes = 0;
    let mut locked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(LockError::Locked(_)) => locked += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(locked, 7);
}

#[tokio::test]
async fn release_allows_reacquire() {
    let transport = VirtualFsTransport::new();
    let clock = FakeClock::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let handle = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await.unwrap();
    release(transport.as_ref(), &handle).await.unwrap();
    let reacquired = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await;
    assert!(reacquired.is_ok());
}

/// A pid that is guaranteed not to be alive: spawn a trivial child and wait
/// for it to exit, reaping it so the pid isn't left a zombie entry `kill
/// -0` could still see.
async fn dead_pid() -> u32 {
    let mut child = tokio::process::Command::new("true").spawn().expect("spawn `true`");
    let pid = child.id().expect("child has a pid");
    child.wait().await.expect("wait for child");
    pid
}

#[tokio::test]
async fn stale_lock_with_dead_pid_is_broken() {
    let transport = VirtualFsTransport::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let local_host = whoami::hostname();

    // Seed the lock directly with a holder whose pid is real but dead —
    // `try_acquire`/`Holder::current` always stamp *this* process's own
    // (live) pid, so the dead case can't be produced by going through them.
    let dir = lock_dir("/srv/locks", fingerprint);
    let holder = Holder { user: "alice".to_string(), host: local_host.clone(), pid: dead_pid().await, project: "/home/dev/app".to_string(), ts: 1000 };
    transport.seed_holder(&dir, &holder);

    let clock = FakeClock::new();
    clock.set_epoch_secs(1200);
    let lock_opts = LockOptions { base_dir: "/srv/locks".to_string(), timeout: Duration::from_millis(100), stale: Duration::from_secs(100) };
    let second = try_acquire(transport.as_ref(), &lock_opts, fingerprint, "/home/dev/app", &clock, &local_host).await;
    assert!(second.is_ok(), "stale lock with dead pid on same host should be broken: {second:?}");
}

#[tokio::test]
async fn stale_lock_with_live_pid_on_same_host_is_kept() {
    let transport = VirtualFsTransport::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let local_host = whoami::hostname();

    // This test process's own pid is, definitionally, alive.
    let dir = lock_dir("/srv/locks", fingerprint);
    let holder = Holder { user: "alice".to_string(), host: local_host.clone(), pid: std::process::id(), project: "/home/dev/app".to_string(), ts: 1000 };
    transport.seed_holder(&dir, &holder);

    let clock = FakeClock::new();
    clock.set_epoch_secs(1150);
    let lock_opts = LockOptions { base_dir: "/srv/locks".to_string(), timeout: Duration::from_millis(100), stale: Duration::from_secs(100) };
    let second = try_acquire(transport.as_ref(), &lock_opts, fingerprint, "/home/dev/app", &clock, &local_host).await;
    assert!(matches!(second, Err(LockError::Locked(_))));
}

#[tokio::test]
async fn stale_lock_on_foreign_host_trusts_timestamp_alone() {
    let transport = VirtualFsTransport::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");

    // A holder recorded on a different machine than the one doing the
    // check: there is no process table to consult, so the wide-margin
    // timestamp check is the only signal (`spec.md` §9 Open Question).
    let dir = lock_dir("/srv/locks", fingerprint);
    let holder = Holder { user: "alice".to_string(), host: "some-other-box".to_string(), pid: std::process::id(), project: "/home/dev/app".to_string(), ts: 1000 };
    transport.seed_holder(&dir, &holder);

    let clock = FakeClock::new();
    let lock_opts = LockOptions { base_dir: "/srv/locks".to_string(), timeout: Duration::from_millis(100), stale: Duration::from_secs(100) };

    // Past `stale` but well within the wide margin: kept, because the
    // holder is on a foreign host and its live pid can't be checked anyway.
    clock.set_epoch_secs(1150);
    let still_locked = try_acquire(transport.as_ref(), &lock_opts, fingerprint, "/home/dev/app", &clock, "this-box").await;
    assert!(matches!(still_locked, Err(LockError::Locked(_))));

    // Past the wide margin: broken unconditionally.
    clock.set_epoch_secs(1000 + 100 * 10 + 1);
    let broken = try_acquire(transport.as_ref(), &lock_opts, fingerprint, "/home/dev/app", &clock, "this-box").await;
    assert!(broken.is_ok(), "lock past the wide stale margin should be broken regardless of pid: {broken:?}");
}

#[tokio::test]
async fn get_lock_holder_reports_unknown_when_free() {
    let transport = VirtualFsTransport::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let holder = get_lock_holder(transport.as_ref(), &opts(), fingerprint).await;
    assert_eq!(holder, "unknown");
}

#[tokio::test]
async fn is_locked_reflects_directory_presence() {
    let transport = VirtualFsTransport::new();
    let clock = FakeClock::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    assert!(!is_locked(transport.as_ref(), &opts(), fingerprint).await);
    let _handle = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await.unwrap();
    assert!(is_locked(transport.as_ref(), &opts(), fingerprint).await);
}

#[tokio::test]
async fn acquire_times_out_when_never_freed() {
    let transport = VirtualFsTransport::new();
    let clock = FakeClock::new();
    let fingerprint = ProjectFingerprint::of_str("/home/dev/app");
    let _holder = try_acquire(transport.as_ref(), &opts(), fingerprint, "/home/dev/app", &clock, "laptop").await.unwrap();

    let short_opts = LockOptions { base_dir: "/srv/locks".to_string(), timeout: Duration::from_millis(50), stale: Duration::from_secs(3600) };
    let result = acquire(transport.as_ref(), &short_opts, fingerprint, "/home/dev/app", &clock, "laptop").await;
    assert!(matches!(result, Err(LockError::Timeout(_))));
}
