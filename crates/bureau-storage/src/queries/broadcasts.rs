// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast delivery ledger operations (append-only).

use bureau_core::BureauError;
use bureau_core::types::{BroadcastEntry, ChatId, MessageRef};
use rusqlite::params;

use crate::database::Database;

/// Append one delivery record.
pub async fn append_broadcast(db: &Database, entry: &BroadcastEntry) -> Result<(), BureauError> {
    let e = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO broadcast_log (batch_id, chat_id, message_id, sent_at, deleted)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![e.batch_id, e.chat_id.0, e.message_id.0, e.sent_at, e.deleted],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List the full ledger, oldest first.
pub async fn list_broadcasts(db: &Database) -> Result<Vec<BroadcastEntry>, BureauError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT batch_id, chat_id, message_id, sent_at, deleted
                 FROM broadcast_log ORDER BY sent_at",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(BroadcastEntry {
                    batch_id: row.get(0)?,
                    chat_id: ChatId(row.get(1)?),
                    message_id: MessageRef(row.get(2)?),
                    sent_at: row.get(3)?,
                    deleted: row.get(4)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn ledger_appends_one_row_per_delivery() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db"), true).await.unwrap();

        for (i, chat) in ["u1", "u2", "u3"].iter().enumerate() {
            append_broadcast(
                &db,
                &BroadcastEntry {
                    batch_id: "B-1".to_string(),
                    chat_id: ChatId(chat.to_string()),
                    message_id: MessageRef(format!("m-{i}")),
                    sent_at: format!("2026-01-01T00:00:0{i}Z"),
                    deleted: false,
                },
            )
            .await
            .unwrap();
        }

        let entries = list_broadcasts(&db).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.batch_id == "B-1" && !e.deleted));
        assert_eq!(entries[0].chat_id, ChatId("u1".into()));
    }
}
