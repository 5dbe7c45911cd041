// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate counts over the row store, computed in memory.
//!
//! The tables are small enough (single-operator bot) that full scans beat
//! maintaining counters.

use std::sync::Arc;

use bureau_core::types::StatsSnapshot;
use bureau_core::{BureauError, Store};
use chrono::{DateTime, Duration, Utc};

pub async fn collect(store: &Arc<dyn Store>) -> Result<StatsSnapshot, BureauError> {
    let users = store.list_users().await?;
    let tickets = store.list_tickets().await?;

    let cutoff = Utc::now() - Duration::days(7);
    let active_last_7_days = users
        .iter()
        .filter(|u| {
            DateTime::parse_from_rfc3339(&u.last_active)
                .map(|t| t.with_timezone(&Utc) >= cutoff)
                .unwrap_or(false)
        })
        .count() as u64;

    let closed_tickets = tickets.iter().filter(|t| !t.answer.is_empty()).count() as u64;

    Ok(StatsSnapshot {
        total_users: users.len() as u64,
        active_last_7_days,
        open_tickets: tickets.len() as u64 - closed_tickets,
        closed_tickets,
    })
}
