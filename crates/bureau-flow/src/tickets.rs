// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket answering and the notify-once delivery rule.
//!
//! Writing the answer and flipping `notified` are two separate store writes
//! with the delivery attempt in between. If delivery fails the answer is
//! already durable and the ticket stays `notified = false`, so the periodic
//! sync scan will retry. `notified` never goes true without a send that
//! returned Ok.

use std::sync::Arc;

use bureau_core::types::Ticket;
use bureau_core::{BureauError, Store};
use chrono::Utc;
use tracing::{info, warn};

use crate::content;
use crate::dispatcher::Dispatcher;

pub struct TicketService {
    store: Arc<dyn Store>,
    dispatcher: Arc<Dispatcher>,
}

impl TicketService {
    pub fn new(store: Arc<dyn Store>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Records an answer on a ticket, then attempts owner delivery.
    ///
    /// Returns the updated ticket. `notified` on the returned row reflects
    /// whether the owner actually received the answer.
    pub async fn answer(&self, ticket_id: &str, answer: &str) -> Result<Ticket, BureauError> {
        let mut ticket =
            self.store
                .get_ticket(ticket_id)
                .await?
                .ok_or_else(|| BureauError::NotFound {
                    kind: "ticket",
                    id: ticket_id.to_string(),
                })?;

        ticket.answer = answer.to_string();
        ticket.answered_at = Some(Utc::now().to_rfc3339());
        self.store.update_ticket(&ticket).await?;

        self.try_notify(&mut ticket).await?;
        Ok(ticket)
    }

    /// Attempts owner delivery for an answered ticket and flips `notified`
    /// on success. Delivery failure is not an error here; the caller and the
    /// sync scan both treat `notified = false` as "retry later".
    pub async fn try_notify(&self, ticket: &mut Ticket) -> Result<(), BureauError> {
        if !ticket.needs_notification() {
            return Ok(());
        }
        let text = content::ticket_answer(ticket);
        match self
            .dispatcher
            .deliver_one(&ticket.chat_id, &text, None)
            .await
        {
            Ok(()) => {
                // Re-read before the flip so a concurrent edit to other
                // fields is not clobbered by our stale copy.
                let mut fresh = self
                    .store
                    .get_ticket(&ticket.id)
                    .await?
                    .unwrap_or_else(|| ticket.clone());
                fresh.notified = true;
                self.store.update_ticket(&fresh).await?;
                ticket.notified = true;
                info!(ticket = %ticket.id, chat = %ticket.chat_id, "ticket answer delivered");
            }
            Err(err) => {
                warn!(ticket = %ticket.id, chat = %ticket.chat_id, error = %err, "ticket answer delivery failed, will retry on sync");
            }
        }
        Ok(())
    }
}
