// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email verification flow: ask, confirm, mark the user verified.
//!
//! The outbound verification send is rate-limited per identity, consumed at
//! the moment the address is accepted -- before the confirmation step -- so
//! a redelivered confirmation cannot burn quota twice.

use bureau_core::types::{ChatId, Draft, FlowStep, LimitedAction, MessageRef, SessionRecord};
use bureau_core::BureauError;
use chrono::Utc;
use tracing::info;

use crate::content;
use crate::email::{is_valid_email, normalize_email};
use crate::engine::FlowEngine;

impl FlowEngine {
    pub(crate) async fn start_verify_email(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        if let Some(user) = self.store.get_user(chat).await? {
            if user.email_confirmed {
                session.reset_flow();
                return self
                    .menus
                    .show(
                        chat,
                        session,
                        content::EMAIL_ALREADY_CONFIRMED,
                        Some(&self.main_menu_keyboard(chat).await?),
                        Some(message_id),
                    )
                    .await;
            }
        }
        session.step = FlowStep::AwaitingEmail;
        session.draft = Draft::None;
        self.prompt(chat, session, content::ASK_EMAIL, Some(message_id))
            .await
    }

    pub(crate) async fn on_email(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let email = self.accept_new_email(chat, text).await?;

        // Quota is consumed here, before the confirmation round-trip.
        if !self
            .limiter
            .try_consume(chat, LimitedAction::EmailSend)
            .await?
        {
            return Err(BureauError::RateLimited {
                action: "email_send",
            });
        }

        session.step = FlowStep::AwaitingEmailConfirm;
        session.draft = Draft::Register {
            email: email.clone(),
        };
        self.prompt(chat, session, &content::confirm_email(&email), None)
            .await
    }

    pub(crate) async fn on_email_confirm(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let Draft::Register { email } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        // Confirmation is re-entry of the same address, compared after
        // normalization. A mismatch discards the draft and starts over.
        if normalize_email(text) != email {
            session.step = FlowStep::AwaitingEmail;
            session.draft = Draft::None;
            return self
                .prompt(chat, session, content::EMAIL_MISMATCH, None)
                .await;
        }

        let mut user = self
            .store
            .get_user(chat)
            .await?
            .ok_or_else(|| BureauError::NotFound {
                kind: "user",
                id: chat.0.clone(),
            })?;
        user.email = Some(email.clone());
        user.email_confirmed = true;
        user.last_active = Utc::now().to_rfc3339();
        self.store.upsert_user(&user).await?;
        info!(chat = %chat, email = %email, "email verified");

        self.finish_flow(chat, session, content::EMAIL_CONFIRMED).await
    }

    /// Validates format and uniqueness of a submitted address.
    async fn accept_new_email(&self, chat: &ChatId, text: &str) -> Result<String, BureauError> {
        if !is_valid_email(text) {
            return Err(BureauError::Validation(content::EMAIL_INVALID.to_string()));
        }
        let email = normalize_email(text);
        if let Some(owner) = self.store.find_user_by_email(&email).await? {
            if owner.chat_id != *chat {
                return Err(BureauError::Validation(content::EMAIL_TAKEN.to_string()));
            }
        }
        Ok(email)
    }
}
