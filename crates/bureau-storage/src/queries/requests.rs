// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request (invest/withdraw intake) table operations.

use bureau_core::BureauError;
use bureau_core::types::{ChatId, Request, RequestKind, RequestStatus};
use rusqlite::params;

use crate::database::Database;

fn row_to_request(row: &rusqlite::Row<'_>) -> Result<Request, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let status: String = row.get(6)?;
    Ok(Request {
        id: row.get(0)?,
        kind: kind.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        chat_id: ChatId(row.get(2)?),
        full_name: row.get(3)?,
        contact: row.get(4)?,
        amount: row.get(5)?,
        // RequestStatus parsing is infallible (unknown -> Other).
        status: status.parse().unwrap_or(RequestStatus::Pending),
        notified: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const REQUEST_COLUMNS: &str =
    "id, kind, chat_id, full_name, contact, amount, status, notified, created_at";

/// Insert a new request.
pub async fn insert_request(db: &Database, request: &Request) -> Result<(), BureauError> {
    let r = request.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO requests (id, kind, chat_id, full_name, contact,
                                       amount, status, notified, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    r.id,
                    r.kind.to_string(),
                    r.chat_id.0,
                    r.full_name,
                    r.contact,
                    r.amount,
                    r.status.to_string(),
                    r.notified,
                    r.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a request by id.
pub async fn get_request(db: &Database, id: &str) -> Result<Option<Request>, BureauError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_request);
            match result {
                Ok(request) => Ok(Some(request)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all requests, oldest first.
pub async fn list_requests(db: &Database) -> Result<Vec<Request>, BureauError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at"
            ))?;
            let rows = stmt.query_map([], row_to_request)?;
            let mut requests = Vec::new();
            for row in rows {
                requests.push(row?);
            }
            Ok(requests)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full-row replace keyed by request id.
pub async fn update_request(db: &Database, request: &Request) -> Result<(), BureauError> {
    let r = request.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE requests SET kind = ?2, chat_id = ?3, full_name = ?4, contact = ?5,
                     amount = ?6, status = ?7, notified = ?8, created_at = ?9
                 WHERE id = ?1",
                params![
                    r.id,
                    r.kind.to_string(),
                    r.chat_id.0,
                    r.full_name,
                    r.contact,
                    r.amount,
                    r.status.to_string(),
                    r.notified,
                    r.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
