// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`Store`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use bureau_config::model::StorageConfig;
use bureau_core::types::{
    BroadcastEntry, ChatId, LimitedAction, RateLimitCounter, Request, SessionRecord, Ticket, User,
};
use bureau_core::{BureauError, Store};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the database, creates parent directories, and runs migrations.
    pub async fn initialize(&self) -> Result<(), BureauError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BureauError::Store {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoints the WAL and releases the connection.
    pub async fn close(&self) -> Result<(), BureauError> {
        self.db()?.close().await
    }

    fn db(&self) -> Result<&Database, BureauError> {
        self.db.get().ok_or_else(|| BureauError::Store {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_user(&self, user: &User) -> Result<(), BureauError> {
        queries::users::upsert_user(self.db()?, user).await
    }

    async fn get_user(&self, chat_id: &ChatId) -> Result<Option<User>, BureauError> {
        queries::users::get_user(self.db()?, chat_id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, BureauError> {
        queries::users::list_users(self.db()?).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, BureauError> {
        queries::users::find_user_by_email(self.db()?, email).await
    }

    async fn get_session(&self, chat_id: &ChatId) -> Result<Option<SessionRecord>, BureauError> {
        queries::sessions::get_session(self.db()?, chat_id).await
    }

    async fn save_session(&self, session: &SessionRecord) -> Result<(), BureauError> {
        queries::sessions::save_session(self.db()?, session).await
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), BureauError> {
        queries::tickets::insert_ticket(self.db()?, ticket).await
    }

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, BureauError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, BureauError> {
        queries::tickets::list_tickets(self.db()?).await
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), BureauError> {
        queries::tickets::update_ticket(self.db()?, ticket).await
    }

    async fn insert_request(&self, request: &Request) -> Result<(), BureauError> {
        queries::requests::insert_request(self.db()?, request).await
    }

    async fn get_request(&self, id: &str) -> Result<Option<Request>, BureauError> {
        queries::requests::get_request(self.db()?, id).await
    }

    async fn list_requests(&self) -> Result<Vec<Request>, BureauError> {
        queries::requests::list_requests(self.db()?).await
    }

    async fn update_request(&self, request: &Request) -> Result<(), BureauError> {
        queries::requests::update_request(self.db()?, request).await
    }

    async fn get_rate_counter(
        &self,
        chat_id: &ChatId,
        action: LimitedAction,
    ) -> Result<Option<RateLimitCounter>, BureauError> {
        queries::rate_limits::get_rate_counter(self.db()?, chat_id, action).await
    }

    async fn put_rate_counter(&self, counter: &RateLimitCounter) -> Result<(), BureauError> {
        queries::rate_limits::put_rate_counter(self.db()?, counter).await
    }

    async fn append_broadcast(&self, entry: &BroadcastEntry) -> Result<(), BureauError> {
        queries::broadcasts::append_broadcast(self.db()?, entry).await
    }

    async fn list_broadcasts(&self) -> Result<Vec<BroadcastEntry>, BureauError> {
        queries::broadcasts::list_broadcasts(self.db()?).await
    }

    async fn try_insert_dedup_key(
        &self,
        key: &str,
        created_at: &str,
    ) -> Result<bool, BureauError> {
        queries::dedup::try_insert_dedup_key(self.db()?, key, created_at).await
    }

    async fn prune_dedup_keys(&self, cutoff: &str) -> Result<u64, BureauError> {
        queries::dedup::prune_dedup_keys(self.db()?, cutoff).await
    }
}
