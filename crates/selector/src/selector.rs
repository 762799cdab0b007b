// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selector: chooses one live alias per host, in priority order, with
//! optional tag filtering and local fallback (`spec.md` §4.5).

use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::Mutex;

use rr_core::{Connection, Host, HostName};

use crate::error::SelectError;
use crate::event::{tracing_event_handler, SelectEvent};
use crate::prober::Prober;

type EventHandler = Box<dyn Fn(&SelectEvent) + Send + Sync>;

/// Host summary returned by [`Selector::host_info`].
#[derive(Debug, Clone)]
pub struct HostDescriptor {
    pub name: HostName,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
}

/// Values substituted into each host's `dir_template` (`spec.md` §3). The
/// Selector performs this resolution itself since it is the component that
/// produces the `Connection.remote_dir` the Workflow consumes.
#[derive(Debug, Clone, Default)]
pub struct DirSubstitutions {
    pub project: String,
    pub branch: String,
    pub user: String,
    pub home: String,
}

pub struct Selector<P: Prober> {
    hosts: IndexMap<HostName, Host>,
    order: Vec<HostName>,
    timeout: Duration,
    local_fallback: bool,
    local_dir: String,
    substitutions: DirSubstitutions,
    prober: P,
    event_handler: Mutex<EventHandler>,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

impl<P: Prober> Selector<P> {
    /// `order` need not cover every key of `hosts`; any host missing from
    /// it is appended in `hosts`' own declaration order so it is never
    /// silently unreachable.
    pub fn new(
        hosts: IndexMap<HostName, Host>,
        order: Vec<HostName>,
        substitutions: DirSubstitutions,
        local_dir: impl Into<String>,
        prober: P,
    ) -> Self {
        let mut order = order;
        for name in hosts.keys() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }
        Self {
            hosts,
            order,
            timeout: DEFAULT_TIMEOUT,
            local_fallback: false,
            local_dir: local_dir.into(),
            substitutions,
            prober,
            event_handler: Mutex::new(Box::new(|event| tracing_event_handler(event))),
        }
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn local_fallback(&self) -> bool {
        self.local_fallback
    }

    pub fn local_dir(&self) -> &str {
        &self.local_dir
    }

    pub fn host_info(&self) -> Vec<HostDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.hosts.get(name))
            .map(|host| HostDescriptor { name: host.name.clone(), aliases: host.aliases.clone(), tags: host.tags.clone() })
            .collect()
    }

    pub fn set_host_order(&mut self, order: Vec<HostName>) {
        let mut order = order;
        for name in self.hosts.keys() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }
        self.order = order;
    }

    pub fn set_local_fallback(&mut self, enabled: bool) {
        self.local_fallback = enabled;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_event_handler(&mut self, handler: impl Fn(&SelectEvent) + Send + Sync + 'static) {
        *self.event_handler.lock() = Box::new(handler);
    }

    fn emit(&self, event: SelectEvent) {
        (self.event_handler.lock())(&event);
    }

    /// `select(preferredName)` (`spec.md` §4.5): an explicit name restricts
    /// iteration to that one host; an empty/absent name iterates all hosts
    /// in priority order.
    pub async fn select(&self, preferred: Option<&str>) -> Result<Connection, SelectError> {
        if self.hosts.is_empty() {
            return Err(SelectError::NoHosts);
        }
        match preferred {
            Some(name) if !name.is_empty() => self.select_host(name).await,
            _ => self.select_over(&self.order.clone()).await,
        }
    }

    pub async fn select_by_tag(&self, tag: &str) -> Result<Connection, SelectError> {
        let candidates: Vec<HostName> = self
            .order
            .iter()
            .filter(|name| self.hosts.get(*name).is_some_and(|host| host.has_tag(tag)))
            .cloned()
            .collect();
        if candidates.is_empty() && !self.local_fallback {
            return Err(SelectError::UnknownTag(tag.to_string()));
        }
        self.select_over(&candidates).await
    }

    pub async fn select_host(&self, name: &str) -> Result<Connection, SelectError> {
        if !self.hosts.contains_key(name) {
            return Err(SelectError::UnknownHost(name.to_string()));
        }
        self.select_over(&[HostName::new(name)]).await
    }

    async fn select_over(&self, candidates: &[HostName]) -> Result<Connection, SelectError> {
        let mut attempted = 0usize;
        for name in candidates {
            let Some(host) = self.hosts.get(name) else { continue };
            for alias in &host.aliases {
                attempted += 1;
                self.emit(SelectEvent::Attempt { alias: alias.clone() });
                match self.prober.probe(alias, self.timeout).await {
                    Ok(latency) => {
                        self.emit(SelectEvent::Connected { alias: alias.clone(), latency });
                        let subs = &self.substitutions;
                        let remote_dir = host.resolve_dir(&subs.project, &subs.branch, &subs.user, &subs.home);
                        return Ok(Connection::remote(host.name.clone(), alias.clone(), latency, remote_dir));
                    }
                    Err(err) => {
                        self.emit(SelectEvent::Failed {
                            alias: alias.clone(),
                            latency: Duration::ZERO,
                            reason: err.reason,
                            message: err.detail.message.clone(),
                        });
                    }
                }
            }
        }

        if self.local_fallback {
            self.emit(SelectEvent::LocalFallback);
            return Ok(Connection::local(self.local_dir.clone()));
        }

        Err(SelectError::AllFailed { hosts: candidates.len(), aliases: attempted })
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
