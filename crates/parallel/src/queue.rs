// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared work-stealing queue (`spec.md` §4.8): idle workers pull the next
//! available task rather than being pre-assigned one. A task restricted to
//! specific hosts can only be claimed by a worker running on one of them.

use std::sync::Arc;

use rr_core::TaskInfo;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<Mutex<Vec<TaskInfo>>>,
}

impl TaskQueue {
    pub fn new(tasks: Vec<TaskInfo>) -> Self {
        Self { inner: Arc::new(Mutex::new(tasks)) }
    }

    /// Claim the first still-queued task this host is allowed to run, or
    /// `None` if nothing is left for it right now.
    pub async fn claim(&self, host_label: &str) -> Option<TaskInfo> {
        let mut queue = self.inner.lock().await;
        let position = queue.iter().position(|task| task.config.hosts.is_empty() || task.config.hosts.iter().any(|h| h == host_label))?;
        Some(queue.remove(position))
    }

    /// Drain whatever is left — used once the run ends (cancelled or
    /// naturally drained) to produce `Skipped` records for tasks no worker
    /// ever claimed.
    pub async fn drain(&self) -> Vec<TaskInfo> {
        let mut queue = self.inner.lock().await;
        std::mem::take(&mut *queue)
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rr_core::TaskConfig;

    fn task(name: &str, hosts: Vec<&str>) -> TaskInfo {
        let mut t = TaskInfo::new(name, 0, "echo hi");
        t.config = TaskConfig { hosts: hosts.into_iter().map(String::from).collect(), timeout: None };
        t
    }

    #[tokio::test]
    async fn unrestricted_task_claimable_by_any_host() {
        let queue = TaskQueue::new(vec![task("a", vec![])]);
        assert_eq!(queue.claim("anyhost").await.unwrap().name, "a");
    }

    #[tokio::test]
    async fn restricted_task_only_claimable_by_named_host() {
        let queue = TaskQueue::new(vec![task("a", vec!["gpu-box"])]);
        assert!(queue.claim("dev").await.is_none());
        assert_eq!(queue.claim("gpu-box").await.unwrap().name, "a");
    }

    #[tokio::test]
    async fn claim_removes_from_queue() {
        let queue = TaskQueue::new(vec![task("a", vec![])]);
        queue.claim("dev").await.unwrap();
        assert!(queue.is_empty().await);
    }
}
