// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic sync scan: the retry mechanism for unnotified outcomes.
//!
//! The scan walks tickets with an answer and `notified = false`, and requests
//! with a terminal status and `notified = false`, attempting delivery for
//! each. It also prunes dedup ledger keys older than the retention window.
//! The scan is safe to run concurrently with live traffic because every flip
//! re-reads its row first, and running it twice is harmless.

use std::sync::Arc;

use bureau_core::types::Request;
use bureau_core::{BureauError, Store};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::content;
use crate::dispatcher::Dispatcher;
use crate::tickets::TicketService;

/// Dedup keys older than this are pruned on every scan.
const DEDUP_RETENTION_HOURS: i64 = 48;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub tickets_notified: u64,
    pub requests_notified: u64,
    pub dedup_keys_pruned: u64,
}

pub struct SyncScan {
    store: Arc<dyn Store>,
    dispatcher: Arc<Dispatcher>,
    tickets: Arc<TicketService>,
}

impl SyncScan {
    pub fn new(
        store: Arc<dyn Store>,
        dispatcher: Arc<Dispatcher>,
        tickets: Arc<TicketService>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            tickets,
        }
    }

    pub async fn run(&self) -> Result<SyncReport, BureauError> {
        let mut report = SyncReport::default();

        for mut ticket in self.store.list_tickets().await? {
            if ticket.needs_notification() {
                self.tickets.try_notify(&mut ticket).await?;
                if ticket.notified {
                    report.tickets_notified += 1;
                }
            }
        }

        for request in self.store.list_requests().await? {
            if request.needs_notification() && self.notify_request(&request).await? {
                report.requests_notified += 1;
            }
        }

        let cutoff = (Utc::now() - Duration::hours(DEDUP_RETENTION_HOURS)).to_rfc3339();
        report.dedup_keys_pruned = self.store.prune_dedup_keys(&cutoff).await?;

        info!(
            tickets = report.tickets_notified,
            requests = report.requests_notified,
            pruned = report.dedup_keys_pruned,
            "sync scan finished"
        );
        Ok(report)
    }

    async fn notify_request(&self, request: &Request) -> Result<bool, BureauError> {
        let text = content::request_status_update(
            request.kind,
            &request.id,
            &request.status.to_string(),
        );
        match self
            .dispatcher
            .deliver_one(&request.chat_id, &text, None)
            .await
        {
            Ok(()) => {
                let mut fresh = self
                    .store
                    .get_request(&request.id)
                    .await?
                    .unwrap_or_else(|| request.clone());
                fresh.notified = true;
                self.store.update_request(&fresh).await?;
                Ok(true)
            }
            Err(err) => {
                warn!(request = %request.id, chat = %request.chat_id, error = %err, "request status delivery failed, will retry on sync");
                Ok(false)
            }
        }
    }
}
