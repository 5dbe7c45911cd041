// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for the row-oriented persistence backend.
//!
//! One flat table per entity, first column always the lookup key. Updates are
//! full-row replaces derived from a freshly re-read row -- the trait exposes
//! no partial-field update so the lost-update discipline is visible at the
//! seam.

use async_trait::async_trait;

use crate::error::BureauError;
use crate::types::{
    BroadcastEntry, ChatId, LimitedAction, RateLimitCounter, Request, SessionRecord, Ticket, User,
};

/// Typed CRUD over the row store.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Users ---

    /// Inserts or fully replaces a user row.
    async fn upsert_user(&self, user: &User) -> Result<(), BureauError>;

    async fn get_user(&self, chat_id: &ChatId) -> Result<Option<User>, BureauError>;

    async fn list_users(&self) -> Result<Vec<User>, BureauError>;

    /// Case-insensitive lookup used for the email-uniqueness check.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, BureauError>;

    // --- Sessions ---

    async fn get_session(&self, chat_id: &ChatId) -> Result<Option<SessionRecord>, BureauError>;

    /// Inserts or fully replaces a session row.
    async fn save_session(&self, session: &SessionRecord) -> Result<(), BureauError>;

    // --- Tickets ---

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), BureauError>;

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, BureauError>;

    async fn list_tickets(&self) -> Result<Vec<Ticket>, BureauError>;

    /// Full-row replace keyed by ticket id.
    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), BureauError>;

    // --- Requests ---

    async fn insert_request(&self, request: &Request) -> Result<(), BureauError>;

    async fn get_request(&self, id: &str) -> Result<Option<Request>, BureauError>;

    async fn list_requests(&self) -> Result<Vec<Request>, BureauError>;

    /// Full-row replace keyed by request id.
    async fn update_request(&self, request: &Request) -> Result<(), BureauError>;

    // --- Rate limit counters ---

    async fn get_rate_counter(
        &self,
        chat_id: &ChatId,
        action: LimitedAction,
    ) -> Result<Option<RateLimitCounter>, BureauError>;

    async fn put_rate_counter(&self, counter: &RateLimitCounter) -> Result<(), BureauError>;

    // --- Broadcast ledger ---

    async fn append_broadcast(&self, entry: &BroadcastEntry) -> Result<(), BureauError>;

    async fn list_broadcasts(&self) -> Result<Vec<BroadcastEntry>, BureauError>;

    // --- Dedup ledger ---

    /// Check-and-set of an idempotency key. Returns `true` when the key was
    /// newly inserted (the caller owns the side effect), `false` when it
    /// already existed (duplicate delivery).
    async fn try_insert_dedup_key(
        &self,
        key: &str,
        created_at: &str,
    ) -> Result<bool, BureauError>;

    /// Deletes dedup keys created before the cutoff. Returns rows removed.
    async fn prune_dedup_keys(&self, cutoff: &str) -> Result<u64, BureauError>;
}
