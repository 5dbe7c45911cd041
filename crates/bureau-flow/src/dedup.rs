// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotency keys for state-mutating steps.
//!
//! The webhook transport is at-least-once: the same event can be processed
//! twice after a crash mid-step. Steps that append a record (ticket and
//! request creation) derive a stable key from (identity, step, draft content)
//! and check-and-set it against the dedup ledger before committing, so a
//! duplicate delivery finds the key already present and skips the insert.

use bureau_core::types::{ChatId, FlowStep};
use sha2::{Digest, Sha256};

/// Derives the idempotency key for one commit attempt.
///
/// Stable across redeliveries of the same event (same identity, same step,
/// same accumulated draft), distinct across genuinely new submissions.
pub fn idempotency_key(chat_id: &ChatId, step: FlowStep, draft_content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(chat_id.0.as_bytes());
    hasher.update([0x1f]);
    hasher.update(step.to_string().as_bytes());
    hasher.update([0x1f]);
    hasher.update(draft_content.as_bytes());
    hex::encode(hasher.finalize())
}
