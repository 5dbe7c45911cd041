// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out message dispatcher for admin broadcasts.
//!
//! Delivery is strictly sequential with a fixed inter-send delay, so a large
//! recipient list cannot burst the transport. Per-recipient failures are
//! isolated: one blocked user never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use bureau_core::ids::batch_id;
use bureau_core::types::{BroadcastEntry, ChatId, Keyboard};
use bureau_core::{BureauError, ChatTransport, Store};
use chrono::Utc;
use tracing::{info, warn};

/// Result counts for one broadcast batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub sent: u64,
    pub failed: u64,
}

pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn Store>,
    delay: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>, store: Arc<dyn Store>, delay_ms: u64) -> Self {
        Self {
            transport,
            store,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Sends `text` to every recipient in order, recording each successful
    /// delivery in the broadcast ledger under a freshly generated batch id.
    pub async fn deliver_batch(
        &self,
        recipients: &[ChatId],
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<BatchOutcome, BureauError> {
        let batch = batch_id();
        let mut sent = 0u64;
        let mut failed = 0u64;

        for (i, chat) in recipients.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }
            match self.transport.send_message(chat, text, keyboard).await {
                Ok(message_id) => {
                    let entry = BroadcastEntry {
                        batch_id: batch.clone(),
                        chat_id: chat.clone(),
                        message_id,
                        sent_at: Utc::now().to_rfc3339(),
                        deleted: false,
                    };
                    // A ledger write failure loses audit data but must not
                    // stop the rest of the batch.
                    if let Err(err) = self.store.append_broadcast(&entry).await {
                        warn!(batch = %batch, chat = %chat, error = %err, "broadcast ledger append failed");
                    }
                    sent += 1;
                }
                Err(err) => {
                    warn!(batch = %batch, chat = %chat, error = %err, "broadcast delivery failed");
                    failed += 1;
                }
            }
        }

        info!(batch = %batch, sent, failed, "broadcast batch finished");
        Ok(BatchOutcome {
            batch_id: batch,
            sent,
            failed,
        })
    }

    /// Sends a single out-of-band notification (ticket answers, request
    /// status updates). No ledger entry; those have their own row state.
    pub async fn deliver_one(
        &self,
        chat: &ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BureauError> {
        self.transport.send_message(chat, text, keyboard).await?;
        Ok(())
    }
}
