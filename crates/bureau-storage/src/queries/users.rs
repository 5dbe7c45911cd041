// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User table operations.

use bureau_core::BureauError;
use bureau_core::types::{ChatId, User};
use rusqlite::params;

use crate::database::Database;

fn row_to_user(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        chat_id: ChatId(row.get(0)?),
        display_name: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        email_confirmed: row.get(4)?,
        joined_at: row.get(5)?,
        last_active: row.get(6)?,
    })
}

const USER_COLUMNS: &str =
    "chat_id, display_name, username, email, email_confirmed, joined_at, last_active";

/// Insert or fully replace a user row.
pub async fn upsert_user(db: &Database, user: &User) -> Result<(), BureauError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (chat_id, display_name, username, email,
                                    email_confirmed, joined_at, last_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(chat_id) DO UPDATE SET
                     display_name = excluded.display_name,
                     username = excluded.username,
                     email = excluded.email,
                     email_confirmed = excluded.email_confirmed,
                     last_active = excluded.last_active",
                params![
                    user.chat_id.0,
                    user.display_name,
                    user.username,
                    user.email,
                    user.email_confirmed,
                    user.joined_at,
                    user.last_active,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by chat id.
pub async fn get_user(db: &Database, chat_id: &ChatId) -> Result<Option<User>, BureauError> {
    let id = chat_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE chat_id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all users, oldest first.
pub async fn list_users(db: &Database) -> Result<Vec<User>, BureauError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY joined_at"))?;
            let rows = stmt.query_map([], row_to_user)?;
            let mut users = Vec::new();
            for row in rows {
                users.push(row?);
            }
            Ok(users)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Case-insensitive lookup by email.
pub async fn find_user_by_email(db: &Database, email: &str) -> Result<Option<User>, BureauError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE email IS NOT NULL AND lower(email) = lower(?1)"
            ))?;
            let result = stmt.query_row(params![email], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
