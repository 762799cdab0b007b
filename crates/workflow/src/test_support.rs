// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake [`Dialer`] for tests: hands back a caller-registered fake
//! transport per alias instead of opening a real SSH session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use rr_core::Connection;
use rr_ssh::test_support::FakeTransport;
use rr_ssh::{Transport, TransportError};

#[derive(Default)]
pub struct FakeDialer {
    by_alias: Mutex<HashMap<String, Arc<FakeTransport>>>,
    local: Mutex<Option<Arc<FakeTransport>>>,
}

impl FakeDialer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(self, alias: impl Into<String>, transport: Arc<FakeTransport>) -> Self {
        self.by_alias.lock().insert(alias.into(), transport);
        self
    }

    pub fn with_local(self, transport: Arc<FakeTransport>) -> Self {
        *self.local.lock() = Some(transport);
        self
    }
}

#[async_trait]
impl crate::dialer::Dialer for FakeDialer {
    async fn dial(&self, conn: &Connection, _timeout: Duration) -> Result<Box<dyn Transport>, TransportError> {
        if conn.is_local {
            if let Some(transport) = self.local.lock().clone() {
                return Ok(Box::new(transport));
            }
            return Ok(Box::new(Arc::new(FakeTransport::new())));
        }
        match self.by_alias.lock().get(&conn.alias).cloned() {
            Some(transport) => Ok(Box::new(transport)),
            None => Ok(Box::new(Arc::new(FakeTransport::new()))),
        }
    }
}
