// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Investment intake: name, contact, amount, then a pending request row.
//!
//! Amounts are stored as the user typed them. Review is human; the bot does
//! not parse or validate currency.

use bureau_core::ids::request_id;
use bureau_core::types::{
    ChatId, Draft, FlowStep, MessageRef, Request, RequestKind, RequestStatus, SessionRecord,
};
use bureau_core::BureauError;
use chrono::Utc;
use tracing::info;

use crate::content;
use crate::engine::FlowEngine;

impl FlowEngine {
    pub(crate) async fn start_invest(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        session.step = FlowStep::AwaitingInvestName;
        session.draft = Draft::Invest {
            full_name: None,
            contact: None,
        };
        self.prompt(chat, session, content::ASK_INVEST_NAME, Some(message_id))
            .await
    }

    pub(crate) async fn on_invest_step(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        step: FlowStep,
        text: &str,
    ) -> Result<(), BureauError> {
        let Draft::Invest { full_name, contact } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        match step {
            FlowStep::AwaitingInvestName => {
                let name = Self::require_nonempty(text, "your full name")?;
                session.step = FlowStep::AwaitingInvestContact;
                session.draft = Draft::Invest {
                    full_name: Some(name),
                    contact: None,
                };
                self.prompt(chat, session, content::ASK_INVEST_CONTACT, None)
                    .await
            }
            FlowStep::AwaitingInvestContact => {
                let contact = Self::require_nonempty(text, "your transaction contact")?;
                session.step = FlowStep::AwaitingInvestAmount;
                session.draft = Draft::Invest {
                    full_name,
                    contact: Some(contact),
                };
                self.prompt(chat, session, content::ASK_INVEST_AMOUNT, None)
                    .await
            }
            FlowStep::AwaitingInvestAmount => {
                let amount = Self::require_nonempty(text, "the amount")?;
                let (Some(full_name), Some(contact)) = (full_name, contact) else {
                    session.reset_flow();
                    return self.show_main_menu(chat, session, None).await;
                };
                self.submit_request(
                    chat,
                    session,
                    RequestKind::Invest,
                    full_name,
                    contact,
                    amount,
                )
                .await
            }
            _ => Ok(()),
        }
    }

    /// Shared tail of the invest and withdraw flows: dedup, insert, admin
    /// alert, user confirmation.
    pub(crate) async fn submit_request(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        kind: RequestKind,
        full_name: String,
        contact: String,
        amount: String,
    ) -> Result<(), BureauError> {
        let content_key = Self::draft_content(session, &amount);
        if !self.claim_submission(chat, session.step, &content_key).await? {
            info!(chat = %chat, %kind, "duplicate request submission suppressed");
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        }

        let request = Request {
            id: request_id(kind),
            kind,
            chat_id: chat.clone(),
            full_name,
            contact,
            amount,
            status: RequestStatus::Pending,
            notified: false,
            created_at: Utc::now().to_rfc3339(),
        };
        self.store.insert_request(&request).await?;
        info!(chat = %chat, request = %request.id, %kind, "request recorded");

        let display_name = self
            .store
            .get_user(chat)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_default();
        self.alert_admin(&content::request_admin_alert(
            kind,
            &request.id,
            &display_name,
            &chat.0,
            &request.full_name,
            &request.contact,
            &request.amount,
        ))
        .await;

        self.finish_flow(chat, session, &content::request_created(kind, &request.id))
            .await
    }
}
