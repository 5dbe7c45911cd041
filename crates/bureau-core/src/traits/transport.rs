// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transport trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::BureauError;
use crate::types::{ChatId, Keyboard, MessageRef};

/// Outbound side of the chat transport: send, edit, delete, and selection
/// acknowledgement. Inbound events arrive over a channel owned by the
/// concrete transport (see bureau-telegram).
///
/// All calls are best-effort remote operations with a per-call timeout inside
/// the transport; there is no inline retry.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a message, optionally with an inline keyboard. Returns the
    /// delivered message's identifier.
    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, BureauError>;

    /// Edits an existing message in place.
    async fn edit_message(
        &self,
        chat: &ChatId,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BureauError>;

    /// Deletes a message. Callers that merely supersede a menu swallow
    /// failures here, since the remote side may have deleted it already.
    async fn delete_message(&self, chat: &ChatId, message: &MessageRef)
    -> Result<(), BureauError>;

    /// Acknowledges a menu selection so the client stops its spinner.
    async fn answer_selection(&self, callback_id: &str) -> Result<(), BureauError>;
}
