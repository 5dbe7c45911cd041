// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived idempotency ledger.
//!
//! `INSERT OR IGNORE` gives an atomic check-and-set: the first handler to
//! insert a key owns the guarded side effect, a redelivered duplicate sees
//! zero rows changed.

use bureau_core::BureauError;
use rusqlite::params;

use crate::database::Database;

/// Check-and-set an idempotency key. Returns true when newly inserted.
pub async fn try_insert_dedup_key(
    db: &Database,
    key: &str,
    created_at: &str,
) -> Result<bool, BureauError> {
    let key = key.to_string();
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO dedup_keys (key, created_at) VALUES (?1, ?2)",
                params![key, created_at],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete keys created before the cutoff. Returns rows removed.
pub async fn prune_dedup_keys(db: &Database, cutoff: &str) -> Result<u64, BureauError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM dedup_keys WHERE created_at < ?1",
                params![cutoff],
            )?;
            Ok(removed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
