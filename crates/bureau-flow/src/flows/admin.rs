// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin-only flows: broadcasts, stats, and ticket replies.
//!
//! All handlers here are reached only for the configured admin chat; the
//! router and the selection dispatcher both enforce that before calling in.

use bureau_core::types::{ChatId, Draft, FlowStep, MenuAction, MessageRef, SessionRecord};
use bureau_core::BureauError;
use tracing::info;

use crate::content;
use crate::engine::FlowEngine;
use crate::stats;

impl FlowEngine {
    pub(crate) async fn handle_admin_selection(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        action: MenuAction,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        match action {
            MenuAction::AdminBroadcast => {
                session.step = FlowStep::AwaitingBroadcastMessage;
                session.draft = Draft::None;
                self.prompt(chat, session, content::ASK_BROADCAST_MESSAGE, Some(message_id))
                    .await
            }
            MenuAction::AdminFilteredBroadcast => {
                session.step = FlowStep::AwaitingFilteredIds;
                session.draft = Draft::None;
                self.prompt(chat, session, content::ASK_FILTERED_IDS, Some(message_id))
                    .await
            }
            MenuAction::AdminStats => {
                let snapshot = stats::collect(&self.store).await?;
                self.menus
                    .show(
                        chat,
                        session,
                        &content::stats_text(&snapshot),
                        Some(&content::admin_menu_keyboard()),
                        Some(message_id),
                    )
                    .await
            }
            MenuAction::ReplyTicket(ticket_id) => {
                // Fail fast if the ticket vanished before prompting for text.
                if self.store.get_ticket(&ticket_id).await?.is_none() {
                    return Err(BureauError::NotFound {
                        kind: "ticket",
                        id: ticket_id,
                    });
                }
                session.step = FlowStep::AwaitingTicketReply;
                session.draft = Draft::TicketReply { ticket_id };
                self.prompt(chat, session, content::ASK_TICKET_ANSWER, Some(message_id))
                    .await
            }
            _ => Ok(()),
        }
    }

    pub(crate) async fn on_broadcast_message(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let text = Self::require_nonempty(text, "the broadcast message")?;
        let recipients: Vec<_> = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|u| u.chat_id)
            .collect();
        info!(recipients = recipients.len(), "starting full broadcast");

        let outcome = self.dispatcher.deliver_batch(&recipients, &text, None).await?;
        session.reset_flow();
        self.send_note(chat, &content::broadcast_summary(outcome.sent, outcome.failed))
            .await;
        self.show_main_menu(chat, session, None).await
    }

    pub(crate) async fn on_filtered_ids(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let recipients: Vec<String> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if recipients.is_empty() {
            return Err(BureauError::Validation(
                content::FILTERED_IDS_EMPTY.to_string(),
            ));
        }

        session.step = FlowStep::AwaitingFilteredMessage;
        session.draft = Draft::FilteredBroadcast { recipients };
        self.prompt(chat, session, content::ASK_FILTERED_MESSAGE, None)
            .await
    }

    pub(crate) async fn on_filtered_message(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let text = Self::require_nonempty(text, "the broadcast message")?;
        let Draft::FilteredBroadcast { recipients } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };
        let recipients: Vec<ChatId> = recipients.into_iter().map(ChatId).collect();
        info!(recipients = recipients.len(), "starting filtered broadcast");

        let outcome = self.dispatcher.deliver_batch(&recipients, &text, None).await?;
        session.reset_flow();
        self.send_note(chat, &content::broadcast_summary(outcome.sent, outcome.failed))
            .await;
        self.show_main_menu(chat, session, None).await
    }

    pub(crate) async fn on_ticket_reply(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
    ) -> Result<(), BureauError> {
        let answer = Self::require_nonempty(text, "the answer")?;
        let Draft::TicketReply { ticket_id } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        let ticket = self.tickets.answer(&ticket_id, &answer).await?;
        session.reset_flow();
        let note = if ticket.notified {
            content::ticket_answer_sent(&ticket.id)
        } else {
            format!(
                "Answer for {} saved, but delivery failed. It will be retried on the next sync.",
                ticket.id
            )
        };
        self.send_note(chat, &note).await;
        self.show_main_menu(chat, session, None).await
    }
}
