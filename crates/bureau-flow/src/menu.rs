// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-active-menu lifecycle.
//!
//! Each conversation tracks at most one live menu message. Showing a new menu
//! either edits an existing message in place (when the caller passes the
//! message the user just interacted with) or deletes the previously tracked
//! menu and sends a fresh one. Either way exactly one identifier ends up
//! recorded on the session.

use std::sync::Arc;

use bureau_core::types::{ChatId, Keyboard, MessageRef, SessionRecord};
use bureau_core::{BureauError, ChatTransport};
use tracing::debug;

pub struct MenuManager {
    transport: Arc<dyn ChatTransport>,
}

impl MenuManager {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Shows a menu and updates `session.last_menu_id` to the live message.
    ///
    /// When `reuse` names a message, that message is edited in place; if the
    /// edit fails (stale id, message gone) we fall through to the
    /// supersede path. On the supersede path the old tracked menu is deleted
    /// first, except when it is the `reuse` target itself -- deleting the
    /// message we are about to replace would leave the chat with nothing.
    /// Delete failures are swallowed: the message may already be gone.
    pub async fn show(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
        keyboard: Option<&Keyboard>,
        reuse: Option<&MessageRef>,
    ) -> Result<(), BureauError> {
        if let Some(target) = reuse {
            match self.transport.edit_message(chat, target, text, keyboard).await {
                Ok(()) => {
                    session.last_menu_id = Some(target.clone());
                    return Ok(());
                }
                Err(err) => {
                    debug!(chat = %chat, message = %target, error = %err, "menu edit failed, sending fresh");
                }
            }
        }

        if let Some(old) = session.last_menu_id.take() {
            if reuse != Some(&old) {
                if let Err(err) = self.transport.delete_message(chat, &old).await {
                    debug!(chat = %chat, message = %old, error = %err, "stale menu delete failed");
                }
            }
        }

        let sent = self.transport.send_message(chat, text, keyboard).await?;
        session.last_menu_id = Some(sent);
        Ok(())
    }
}
