// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session table operations.
//!
//! The draft cell stores the tagged [`Draft`] enum as JSON. A corrupted cell
//! deserializes to `Draft::None` rather than wedging the session.

use bureau_core::BureauError;
use bureau_core::types::{ChatId, Draft, FlowStep, MessageRef, SessionRecord};
use rusqlite::params;

use crate::database::Database;

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    let step: String = row.get(1)?;
    let draft_json: String = row.get(2)?;
    let last_menu_id: Option<String> = row.get(3)?;
    Ok(SessionRecord {
        chat_id: ChatId(row.get(0)?),
        step: FlowStep::parse(&step),
        draft: serde_json::from_str(&draft_json).unwrap_or_default(),
        last_menu_id: last_menu_id.map(MessageRef),
        updated_at: row.get(4)?,
    })
}

/// Get a session by chat id.
pub async fn get_session(
    db: &Database,
    chat_id: &ChatId,
) -> Result<Option<SessionRecord>, BureauError> {
    let id = chat_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT chat_id, step, draft, last_menu_id, updated_at
                 FROM sessions WHERE chat_id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or fully replace a session row.
pub async fn save_session(db: &Database, session: &SessionRecord) -> Result<(), BureauError> {
    let draft_json = serde_json::to_string(&session.draft).map_err(|e| BureauError::Store {
        source: Box::new(e),
    })?;
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (chat_id, step, draft, last_menu_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(chat_id) DO UPDATE SET
                     step = excluded.step,
                     draft = excluded.draft,
                     last_menu_id = excluded.last_menu_id,
                     updated_at = excluded.updated_at",
                params![
                    session.chat_id.0,
                    session.step.to_string(),
                    draft_json,
                    session.last_menu_id.as_ref().map(|m| m.0.clone()),
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
