// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limit counter operations, keyed by (chat_id, action).

use bureau_core::BureauError;
use bureau_core::types::{ChatId, LimitedAction, RateLimitCounter};
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;

/// Get the counter for one identity and action.
pub async fn get_rate_counter(
    db: &Database,
    chat_id: &ChatId,
    action: LimitedAction,
) -> Result<Option<RateLimitCounter>, BureauError> {
    let id = chat_id.0.clone();
    let action_str = action.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT chat_id, action, count, last_action_at
                 FROM rate_limits WHERE chat_id = ?1 AND action = ?2",
            )?;
            let result = stmt.query_row(params![id, action_str], |row| {
                let chat_id: String = row.get(0)?;
                let last_action_at: String = row.get(3)?;
                let parsed: DateTime<Utc> = last_action_at
                    .parse()
                    .map_err(|e: chrono::ParseError| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(RateLimitCounter {
                    chat_id: ChatId(chat_id),
                    action,
                    count: row.get(2)?,
                    last_action_at: parsed,
                })
            });
            match result {
                Ok(counter) => Ok(Some(counter)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or fully replace a counter row.
pub async fn put_rate_counter(db: &Database, counter: &RateLimitCounter) -> Result<(), BureauError> {
    let c = counter.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO rate_limits (chat_id, action, count, last_action_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(chat_id, action) DO UPDATE SET
                     count = excluded.count,
                     last_action_at = excluded.last_action_at",
                params![
                    c.chat_id.0,
                    c.action.to_string(),
                    c.count,
                    c.last_action_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
