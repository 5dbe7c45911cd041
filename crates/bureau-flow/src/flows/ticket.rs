// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support ticket flow.
//!
//! The create quota is consumed when the user selects "Support ticket", not
//! at final submission: a user who keeps opening the flow and abandoning it
//! burns their own quota, and the fourth selection inside the window is
//! denied before any prompt is shown. Users with a verified email skip the
//! email collection steps.

use bureau_core::ids::ticket_id;
use bureau_core::types::{
    ChatId, Draft, FlowStep, LimitedAction, MessageRef, SessionRecord, Ticket,
};
use bureau_core::BureauError;
use chrono::Utc;
use tracing::info;

use crate::content;
use crate::email::{is_valid_email, normalize_email};
use crate::engine::FlowEngine;

impl FlowEngine {
    pub(crate) async fn start_ticket(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        if !self
            .limiter
            .try_consume(chat, LimitedAction::TicketCreate)
            .await?
        {
            return Err(BureauError::RateLimited {
                action: "ticket_create",
            });
        }

        let verified_email = self
            .store
            .get_user(chat)
            .await?
            .filter(|u| u.email_confirmed)
            .and_then(|u| u.email);

        match verified_email {
            Some(email) => {
                session.step = FlowStep::AwaitingTicketMessage;
                session.draft = Draft::Ticket { email };
                self.prompt(chat, session, content::ASK_TICKET_MESSAGE, Some(message_id))
                    .await
            }
            None => {
                session.step = FlowStep::AwaitingTicketEmail;
                session.draft = Draft::None;
                self.prompt(chat, session, content::ASK_TICKET_EMAIL, Some(message_id))
                    .await
            }
        }
    }

    pub(crate) async fn on_ticket_email(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        if !is_valid_email(text) {
            return Err(BureauError::Validation(content::EMAIL_INVALID.to_string()));
        }
        let email = normalize_email(text);
        session.step = FlowStep::AwaitingTicketEmailConfirm;
        session.draft = Draft::Ticket {
            email: email.clone(),
        };
        self.prompt(chat, session, &content::confirm_email(&email), None)
            .await
    }

    pub(crate) async fn on_ticket_email_confirm(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let Draft::Ticket { email } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        // Same re-entry protocol as registration: a mismatch discards the
        // draft and restarts the email step.
        if normalize_email(text) != email {
            session.step = FlowStep::AwaitingTicketEmail;
            session.draft = Draft::None;
            return self
                .prompt(chat, session, content::EMAIL_MISMATCH, None)
                .await;
        }

        session.step = FlowStep::AwaitingTicketMessage;
        self.prompt(chat, session, content::ASK_TICKET_MESSAGE, None)
            .await
    }

    pub(crate) async fn on_ticket_message(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let message = Self::require_nonempty(text, "your issue description")?;
        let Draft::Ticket { email } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        let content_key = Self::draft_content(session, &message);
        if !self
            .claim_submission(chat, FlowStep::AwaitingTicketMessage, &content_key)
            .await?
        {
            info!(chat = %chat, "duplicate ticket submission suppressed");
            return self.finish_flow(chat, session, content::TICKET_DUPLICATE).await;
        }

        let ticket = Ticket {
            id: ticket_id(),
            chat_id: chat.clone(),
            email,
            message,
            answer: String::new(),
            created_at: Utc::now().to_rfc3339(),
            answered_at: None,
            notified: false,
        };
        self.store.insert_ticket(&ticket).await?;
        info!(chat = %chat, ticket = %ticket.id, "ticket created");

        let display_name = self
            .store
            .get_user(chat)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_default();
        if let Some(admin) = self.admin_chat.clone() {
            let alert = content::ticket_admin_alert(&ticket, &display_name);
            let keyboard = content::ticket_reply_keyboard(&ticket.id);
            if let Err(err) = self
                .transport
                .send_message(&admin, &alert, Some(&keyboard))
                .await
            {
                // The ticket row is durable; the admin can still find it via
                // the export endpoint.
                tracing::warn!(ticket = %ticket.id, error = %err, "admin ticket alert failed");
            }
        }

        self.finish_flow(chat, session, &content::ticket_created(&ticket.id))
            .await
    }
}
