// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket table operations.

use bureau_core::BureauError;
use bureau_core::types::{ChatId, Ticket};
use rusqlite::params;

use crate::database::Database;

fn row_to_ticket(row: &rusqlite::Row<'_>) -> Result<Ticket, rusqlite::Error> {
    Ok(Ticket {
        id: row.get(0)?,
        chat_id: ChatId(row.get(1)?),
        email: row.get(2)?,
        message: row.get(3)?,
        answer: row.get(4)?,
        created_at: row.get(5)?,
        answered_at: row.get(6)?,
        notified: row.get(7)?,
    })
}

const TICKET_COLUMNS: &str =
    "id, chat_id, email, message, answer, created_at, answered_at, notified";

/// Insert a new ticket.
pub async fn insert_ticket(db: &Database, ticket: &Ticket) -> Result<(), BureauError> {
    let t = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (id, chat_id, email, message, answer,
                                      created_at, answered_at, notified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    t.id,
                    t.chat_id.0,
                    t.email,
                    t.message,
                    t.answer,
                    t.created_at,
                    t.answered_at,
                    t.notified,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a ticket by id.
pub async fn get_ticket(db: &Database, id: &str) -> Result<Option<Ticket>, BureauError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_ticket);
            match result {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all tickets, oldest first.
pub async fn list_tickets(db: &Database) -> Result<Vec<Ticket>, BureauError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at"))?;
            let rows = stmt.query_map([], row_to_ticket)?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full-row replace keyed by ticket id.
pub async fn update_ticket(db: &Database, ticket: &Ticket) -> Result<(), BureauError> {
    let t = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets SET chat_id = ?2, email = ?3, message = ?4, answer = ?5,
                     created_at = ?6, answered_at = ?7, notified = ?8
                 WHERE id = ?1",
                params![
                    t.id,
                    t.chat_id.0,
                    t.email,
                    t.message,
                    t.answer,
                    t.created_at,
                    t.answered_at,
                    t.notified,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db"), true).await.unwrap();
        (db, dir)
    }

    fn make_ticket(id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            chat_id: ChatId("u1".into()),
            email: "a@b.com".to_string(),
            message: "my payment is stuck".to_string(),
            answer: String::new(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            answered_at: None,
            notified: false,
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trips() {
        let (db, _dir) = setup_db().await;
        let ticket = make_ticket("TKT-1");
        insert_ticket(&db, &ticket).await.unwrap();
        assert_eq!(get_ticket(&db, "TKT-1").await.unwrap().unwrap(), ticket);
        assert!(get_ticket(&db, "TKT-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (db, _dir) = setup_db().await;
        insert_ticket(&db, &make_ticket("TKT-1")).await.unwrap();
        assert!(insert_ticket(&db, &make_ticket("TKT-1")).await.is_err());
    }

    #[tokio::test]
    async fn update_replaces_answer_fields() {
        let (db, _dir) = setup_db().await;
        insert_ticket(&db, &make_ticket("TKT-1")).await.unwrap();

        let mut t = get_ticket(&db, "TKT-1").await.unwrap().unwrap();
        t.answer = "resolved, sorry".to_string();
        t.answered_at = Some("2026-01-02T00:00:00Z".to_string());
        update_ticket(&db, &t).await.unwrap();

        let got = get_ticket(&db, "TKT-1").await.unwrap().unwrap();
        assert_eq!(got.answer, "resolved, sorry");
        assert!(got.needs_notification());
    }
}
