// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The [`Database`] struct IS the single writer: query modules accept
//! `&Database` and go through `conn.call()`. Do NOT create additional
//! Connection instances for writes.

use std::path::Path;

use bureau_core::BureauError;
use tracing::debug;

use crate::migrations;

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs pending migrations.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, BureauError> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| BureauError::Store {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path.as_ref())
            .await
            .map_err(|e| BureauError::Store {
                source: Box::new(e),
            })?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal};
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;"
        );
        conn.call(move |conn| {
            conn.execute_batch(&pragmas)?;
            // refinery's error has no rusqlite counterpart; carry it boxed.
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path.as_ref().display(), "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(&self) -> Result<(), BureauError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Maps a tokio-rusqlite error into the store branch of [`BureauError`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> BureauError {
    BureauError::Store {
        source: Box::new(e),
    }
}
