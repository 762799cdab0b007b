use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rr_config::Resolved;
use rr_core::{FailureReason, SystemClock, TaskStatus};
use rr_selector::test_support::FakeProber;
use rr_ssh::test_support::{FakeResponse, FakeTransport};
use rr_sync::test_support::FakeSyncDriver;
use rr_workflow::test_support::FakeDialer;

use super::*;

fn resolved(global_toml: &str, project_toml: &str) -> Resolved {
    Resolved {
        global: toml::from_str(global_toml).unwrap(),
        project: toml::from_str(project_toml).unwrap(),
        project_root: PathBuf::from("/home/dev/app"),
        cwd: PathBuf::from("/home/dev/app"),
    }
}

fn two_host_global() -> &'static str {
    r#"
        version = 1
        [hosts.web1]
        ssh = ["web1.example"]
        dir = "/srv/app"
        [hosts.web2]
        ssh = ["web2.example"]
        dir = "/srv/app"
        [defaults]
        local_fallback = false
    "#
}

fn config(log_dir: PathBuf) -> ParallelConfig {
    ParallelConfig {
        max_parallel: 0,
        fail_fast: false,
        output_mode: rr_core::OutputMode::Quiet,
        save_logs: true,
        log_dir,
        setup: None,
        timeout: None,
        wait_timeout: Duration::from_secs(5),
        skip_sync: true,
        skip_lock: true,
        dry_run: false,
        probe_timeout: None,
    }
}

#[tokio::test]
async fn runs_flattened_tasks_across_available_hosts() {
    let resolved = resolved(
        two_host_global(),
        r#"
            [tasks.lint]
            run = "cargo clippy"

            [tasks.test]
            run = "cargo test"

            [tasks.ci]
            parallel = ["lint", "test"]
        "#,
    );

    let prober = FakeProber::new().succeeding("web1.example", Duration::from_millis(5)).succeeding("web2.example", Duration::from_millis(5));
    let web1 = Arc::new(FakeTransport::new().on("clippy", FakeResponse::ok("clean")).on("test", FakeResponse::ok("ok")));
    let web2 = Arc::new(FakeTransport::new().on("clippy", FakeResponse::ok("clean")).on("test", FakeResponse::ok("ok")));
    let dialer = FakeDialer::new().with_alias("web1.example", web1).with_alias("web2.example", web2);
    let sync_driver: Arc<dyn rr_sync::SyncDriver> = Arc::new(FakeSyncDriver::new());
    let clock = SystemClock;

    let tmp = tempfile::tempdir().unwrap();
    let deps = ParallelDeps { prober, dialer, sync_driver, clock: &clock };

    let result = run_parallel(&resolved, "ci", &["ci".to_string()], &PathBuf::from("/home/dev/app"), config(tmp.path().to_path_buf()), deps)
        .await
        .unwrap();

    assert_eq!(result.records.len(), 2);
    assert!(result.records.iter().all(|r| r.status == TaskStatus::Passed));
    assert_eq!(result.exit_code(), 0);
}

#[tokio::test]
async fn no_reachable_host_is_reported() {
    let resolved = resolved(
        two_host_global(),
        r#"
            [tasks.lint]
            run = "cargo clippy"
        "#,
    );

    let prober = FakeProber::new().failing("web1.example", FailureReason::Unreachable).failing("web2.example", FailureReason::Unreachable);
    let dialer = FakeDialer::new();
    let sync_driver: Arc<dyn rr_sync::SyncDriver> = Arc::new(FakeSyncDriver::new());
    let clock = SystemClock;
    let tmp = tempfile::tempdir().unwrap();
    let deps = ParallelDeps { prober, dialer, sync_driver, clock: &clock };

    let err = run_parallel(&resolved, "lint", &["lint".to_string()], &PathBuf::from("/home/dev/app"), config(tmp.path().to_path_buf()), deps)
        .await
        .unwrap_err();

    assert!(matches!(err, ParallelError::NoHostsAvailable));
}

#[tokio::test]
async fn failing_task_marks_exit_code_nonzero() {
    let resolved = resolved(
        two_host_global(),
        r#"
            [tasks.lint]
            run = "cargo clippy"
            hosts = ["web1"]
        "#,
    );

    let prober = FakeProber::new().succeeding("web1.example", Duration::from_millis(5)).succeeding("web2.example", Duration::from_millis(5));
    let web1 = Arc::new(FakeTransport::new().on("clippy", FakeResponse::failing(1, "boom")));
    let web2 = Arc::new(FakeTransport::new());
    let dialer = FakeDialer::new().with_alias("web1.example", web1).with_alias("web2.example", web2);
    let sync_driver: Arc<dyn rr_sync::SyncDriver> = Arc::new(FakeSyncDriver::new());
    let clock = SystemClock;
    let tmp = tempfile::tempdir().unwrap();
    let deps = ParallelDeps { prober, dialer, sync_driver, clock: &clock };

    let result = run_parallel(&resolved, "lint", &["lint".to_string()], &PathBuf::from("/home/dev/app"), config(tmp.path().to_path_buf()), deps)
        .await
        .unwrap();

    assert_eq!(result.exit_code(), 1);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].host, "web1");
}

/// `spec.md` §8: "given three tasks where the second fails, with
/// fail-fast the third is not started; without, all three complete."
/// All three tasks are pinned to `web1` with `max_parallel = 1` so a
/// single worker claims them strictly in declaration order.
async fn run_three_tasks(fail_fast: bool) -> rr_core::RunResult {
    let resolved = resolved(
        two_host_global(),
        r#"
            [tasks.t1]
            run = "step-one"
            hosts = ["web1"]

            [tasks.t2]
            run = "step-two"
            hosts = ["web1"]

            [tasks.t3]
            run = "step-three"
            hosts = ["web1"]

            [tasks.all]
            parallel = ["t1", "t2", "t3"]
        "#,
    );

    let prober = FakeProber::new().succeeding("web1.example", Duration::from_millis(1));
    let web1 = Arc::new(
        FakeTransport::new()
            .on("step-one", FakeResponse::ok("one"))
            .on("step-two", FakeResponse::failing(2, "two failed"))
            .on("step-three", FakeResponse::ok("three")),
    );
    let dialer = FakeDialer::new().with_alias("web1.example", web1);
    let sync_driver: Arc<dyn rr_sync::SyncDriver> = Arc::new(FakeSyncDriver::new());
    let clock = SystemClock;
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = config(tmp.path().to_path_buf());
    cfg.max_parallel = 1;
    cfg.fail_fast = fail_fast;
    let deps = ParallelDeps { prober, dialer, sync_driver, clock: &clock };

    run_parallel(&resolved, "all", &["all".to_string()], &PathBuf::from("/home/dev/app"), cfg, deps).await.unwrap()
}

#[tokio::test]
async fn fail_fast_skips_remaining_tasks_after_first_failure() {
    let result = run_three_tasks(true).await;

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.records[0].status, TaskStatus::Passed);
    assert_eq!(result.records[1].status, TaskStatus::Failed);
    assert_eq!(result.records[2].status, TaskStatus::Skipped);
    assert_ne!(result.exit_code(), 0);
}

#[tokio::test]
async fn without_fail_fast_every_task_runs_to_completion() {
    let result = run_three_tasks(false).await;

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.records[0].status, TaskStatus::Passed);
    assert_eq!(result.records[1].status, TaskStatus::Failed);
    assert_eq!(result.records[2].status, TaskStatus::Passed);
    assert_ne!(result.exit_code(), 0);
}
