// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-identity event serialization.
//!
//! The row store has no native locking, so two events from the same user
//! handled concurrently would race their session read-modify-write. A keyed
//! mutex serializes handling per chat id while leaving different users fully
//! concurrent. The durable row stays the source of truth; the lock only
//! orders access to it within this process.

use std::sync::Arc;

use bureau_core::types::ChatId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed mutex over chat identities.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<ChatId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one identity, waiting behind any in-flight event
    /// for the same identity. The guard is held for the whole event.
    pub async fn acquire(&self, chat_id: &ChatId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(chat_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
