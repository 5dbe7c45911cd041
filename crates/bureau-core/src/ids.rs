// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifier generation for tickets, requests, and dispatcher batches.
//!
//! Ids embed the creation time plus a random suffix so that two records
//! created in the same instant by concurrent handlers cannot collide.

use chrono::Utc;
use rand::Rng;

use crate::types::RequestKind;

/// Six lowercase hex characters of randomness.
fn random_suffix() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("{n:06x}")
}

/// Generates a ticket id, e.g. `TKT-1767225600-3fa9c1`.
pub fn ticket_id() -> String {
    format!("TKT-{}-{}", Utc::now().timestamp(), random_suffix())
}

/// Generates a request id, prefixed by kind: `INV-...` or `WDR-...`.
pub fn request_id(kind: RequestKind) -> String {
    let prefix = match kind {
        RequestKind::Invest => "INV",
        RequestKind::Withdraw => "WDR",
    };
    format!("{prefix}-{}-{}", Utc::now().timestamp(), random_suffix())
}

/// Generates a dispatcher batch id for the broadcast ledger.
pub fn batch_id() -> String {
    format!("B-{}-{}", Utc::now().timestamp(), random_suffix())
}
