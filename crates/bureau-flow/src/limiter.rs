// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window rate limiter for ticket creation and email verification.
//!
//! This is an approximate window: a gap of more than 24h since the last
//! action re-anchors the window with `count = 1`. Under adversarial timing
//! that allows up to 2x the limit within a rolling 24h span straddling a
//! reset. That is the documented, accepted behavior -- not a rewrite target.

use std::sync::Arc;

use bureau_core::types::{ChatId, LimitedAction, RateLimitCounter};
use bureau_core::{BureauError, Store};
use chrono::{Duration, Utc};
use tracing::debug;

/// Window length for all limited actions.
const WINDOW_HOURS: i64 = 24;

pub struct RateLimiter {
    store: Arc<dyn Store>,
    limit: u32,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn Store>, limit: u32) -> Self {
        Self { store, limit }
    }

    /// Attempts to consume one unit for (identity, action).
    ///
    /// Allowed calls increment and persist the counter before returning, so
    /// the caller can attempt the guarded send knowing the quota is already
    /// burned (double-submission prevention, per the step ordering rules).
    /// Denied calls mutate nothing.
    pub async fn try_consume(
        &self,
        chat_id: &ChatId,
        action: LimitedAction,
    ) -> Result<bool, BureauError> {
        let now = Utc::now();
        let counter = self.store.get_rate_counter(chat_id, action).await?;

        let next = match counter {
            Some(c) if now - c.last_action_at <= Duration::hours(WINDOW_HOURS) => {
                if c.count >= self.limit {
                    debug!(chat_id = %chat_id, action = %action, count = c.count, "rate limit denied");
                    return Ok(false);
                }
                RateLimitCounter {
                    count: c.count + 1,
                    last_action_at: now,
                    ..c
                }
            }
            // No counter yet, or the window expired: re-anchor.
            _ => RateLimitCounter {
                chat_id: chat_id.clone(),
                action,
                count: 1,
                last_action_at: now,
            },
        };

        self.store.put_rate_counter(&next).await?;
        Ok(true)
    }
}
