// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flow engine: event intake, per-identity locking, routing, and the
//! failure policy.
//!
//! One [`FlowEngine`] instance serves all users. `run` drains the inbound
//! event channel, spawning a task per event; the keyed mutex inside
//! `handle_event` restores ordering per identity, so distinct users proceed
//! concurrently while one user's events apply strictly in order.

use std::sync::Arc;

use bureau_core::types::{
    ChatEvent, ChatId, FlowStep, MenuAction, MessageRef, SenderProfile, SessionRecord, User,
};
use bureau_core::{BureauError, ChatTransport, Store};
use bureau_config::model::LimitsConfig;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::content;
use crate::dispatcher::Dispatcher;
use crate::limiter::RateLimiter;
use crate::locks::SessionLocks;
use crate::menu::MenuManager;
use crate::router::{self, Route};
use crate::tickets::TicketService;

pub struct FlowEngine {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) transport: Arc<dyn ChatTransport>,
    pub(crate) menus: MenuManager,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) tickets: Arc<TicketService>,
    pub(crate) limiter: RateLimiter,
    locks: SessionLocks,
    pub(crate) admin_chat: Option<ChatId>,
}

impl FlowEngine {
    pub fn new(
        store: Arc<dyn Store>,
        transport: Arc<dyn ChatTransport>,
        dispatcher: Arc<Dispatcher>,
        tickets: Arc<TicketService>,
        admin_chat: Option<ChatId>,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            menus: MenuManager::new(transport.clone()),
            limiter: RateLimiter::new(store.clone(), limits.daily_limit),
            locks: SessionLocks::new(),
            store,
            transport,
            dispatcher,
            tickets,
            admin_chat,
        }
    }

    /// Drains the inbound channel until the transport closes it.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<ChatEvent>) {
        while let Some(event) = events.recv().await {
            let engine = self.clone();
            tokio::spawn(async move {
                engine.handle_event(event).await;
            });
        }
        info!("event channel closed, flow engine stopping");
    }

    /// Handles one inbound event end to end. Never propagates an error: the
    /// failure policy turns errors into user/admin messages and log lines.
    pub async fn handle_event(&self, event: ChatEvent) {
        let chat = event.chat().clone();
        let _guard = self.locks.acquire(&chat).await;

        // Stop the client spinner promptly; the selection is handled either way.
        if let ChatEvent::Selection { callback_id, .. } = &event {
            if let Err(err) = self.transport.answer_selection(callback_id).await {
                debug!(chat = %chat, error = %err, "selection ack failed");
            }
        }

        if let Err(err) = self.touch_user(&chat, event.profile()).await {
            error!(chat = %chat, error = %err, "user upsert failed, dropping event");
            return;
        }

        let mut session = match self.load_session(&chat).await {
            Ok(session) => session,
            Err(err) => {
                error!(chat = %chat, error = %err, "session load failed, dropping event");
                return;
            }
        };

        let loaded = session.clone();
        let outcome = self.process(&event, &mut session).await;
        if let Err(err) = outcome {
            self.report_failure(&chat, &mut session, loaded, err).await;
        }

        session.updated_at = Utc::now().to_rfc3339();
        if let Err(err) = self.store.save_session(&session).await {
            error!(chat = %chat, error = %err, "session save failed");
        }
    }

    async fn process(
        &self,
        event: &ChatEvent,
        session: &mut SessionRecord,
    ) -> Result<(), BureauError> {
        let chat = event.chat().clone();
        let is_admin = self.is_admin(&chat);

        match router::resolve(event, session, is_admin) {
            Route::Ignore => {
                debug!(chat = %chat, "ignoring undecodable selection");
                Ok(())
            }
            Route::MainMenu => self.show_main_menu(&chat, session, None).await,
            Route::Selection(action) => {
                let ChatEvent::Selection { message_id, .. } = event else {
                    return Ok(());
                };
                self.handle_selection(&chat, session, action, message_id).await
            }
            Route::UserStep(step) => {
                let ChatEvent::Text { text, .. } = event else {
                    return Ok(());
                };
                self.handle_user_step(&chat, session, step, text).await
            }
            Route::AdminStep(step) => {
                let ChatEvent::Text { text, .. } = event else {
                    return Ok(());
                };
                self.handle_admin_step(&chat, session, step, text).await
            }
        }
    }

    async fn handle_selection(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        action: MenuAction,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        match action {
            MenuAction::MainMenu | MenuAction::Cancel => {
                let was_active = !session.step.is_idle();
                session.reset_flow();
                if was_active {
                    self.menus
                        .show(
                            chat,
                            session,
                            content::FLOW_CANCELLED,
                            Some(&self.main_menu_keyboard(chat).await?),
                            Some(message_id),
                        )
                        .await
                } else {
                    self.show_main_menu(chat, session, Some(message_id)).await
                }
            }
            MenuAction::VerifyEmail => self.start_verify_email(chat, session, message_id).await,
            MenuAction::SupportTicket => self.start_ticket(chat, session, message_id).await,
            MenuAction::Invest => self.start_invest(chat, session, message_id).await,
            MenuAction::Withdraw => self.start_withdraw(chat, session, message_id).await,
            MenuAction::AdminBroadcast
            | MenuAction::AdminFilteredBroadcast
            | MenuAction::AdminStats
            | MenuAction::ReplyTicket(_) => {
                if !self.is_admin(chat) {
                    warn!(chat = %chat, ?action, "non-admin pressed an admin button");
                    return Ok(());
                }
                self.handle_admin_selection(chat, session, action, message_id)
                    .await
            }
        }
    }

    async fn handle_user_step(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        step: FlowStep,
        text: &str,
    ) -> Result<(), BureauError> {
        match step {
            FlowStep::AwaitingEmail => self.on_email(chat, session, text).await,
            FlowStep::AwaitingEmailConfirm => self.on_email_confirm(chat, session, text).await,
            FlowStep::AwaitingTicketEmail => self.on_ticket_email(chat, session, text).await,
            FlowStep::AwaitingTicketEmailConfirm => {
                self.on_ticket_email_confirm(chat, session, text).await
            }
            FlowStep::AwaitingTicketMessage => self.on_ticket_message(chat, session, text).await,
            FlowStep::AwaitingInvestName
            | FlowStep::AwaitingInvestContact
            | FlowStep::AwaitingInvestAmount => {
                self.on_invest_step(chat, session, step, text).await
            }
            FlowStep::AwaitingWithdrawName
            | FlowStep::AwaitingWithdrawWallet
            | FlowStep::AwaitingWithdrawAmount => {
                self.on_withdraw_step(chat, session, step, text).await
            }
            // Admin steps never reach here (router) and Idle routes to the
            // main menu; a mismatched row just resets.
            _ => {
                warn!(chat = %chat, %step, "text for unroutable step, resetting flow");
                session.reset_flow();
                self.show_main_menu(chat, session, None).await
            }
        }
    }

    async fn handle_admin_step(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        step: FlowStep,
        text: &str,
    ) -> Result<(), BureauError> {
        match step {
            FlowStep::AwaitingBroadcastMessage => self.on_broadcast_message(chat, session, text).await,
            FlowStep::AwaitingFilteredIds => self.on_filtered_ids(chat, session, text).await,
            FlowStep::AwaitingFilteredMessage => {
                self.on_filtered_message(chat, session, text).await
            }
            FlowStep::AwaitingTicketReply => self.on_ticket_reply(chat, session, text).await,
            _ => Ok(()),
        }
    }

    /// Maps a handler error to the user/admin surface. Only a missing
    /// referenced record clears the flow; every other failure restores the
    /// session as it was loaded, so retrying the same input re-enters the
    /// same step with nothing half-committed.
    async fn report_failure(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        loaded: SessionRecord,
        err: BureauError,
    ) {
        match err {
            BureauError::Validation(message) => {
                *session = loaded;
                self.send_note(chat, &message).await;
            }
            BureauError::RateLimited { action } => {
                *session = loaded;
                let text = match action {
                    "ticket_create" => content::TICKET_RATE_LIMITED,
                    _ => content::EMAIL_RATE_LIMITED,
                };
                self.send_note(chat, text).await;
            }
            BureauError::NotFound { kind, ref id } => {
                warn!(chat = %chat, kind, id = %id, "referenced record missing, resetting flow");
                session.reset_flow();
                let text = if kind == "ticket" {
                    content::TICKET_REPLY_GONE
                } else {
                    content::RECORD_GONE
                };
                self.send_note(chat, text).await;
            }
            err => {
                error!(chat = %chat, error = %err, "handler failed");
                *session = loaded;
                self.send_note(chat, content::GENERIC_ERROR).await;
                self.alert_admin(&content::admin_failure_alert(&chat.0, &err.to_string()))
                    .await;
            }
        }
    }

    // --- Shared helpers used by the flow handlers ---

    pub(crate) fn is_admin(&self, chat: &ChatId) -> bool {
        self.admin_chat.as_ref() == Some(chat)
    }

    pub(crate) async fn show_main_menu(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        reuse: Option<&MessageRef>,
    ) -> Result<(), BureauError> {
        if self.is_admin(chat) {
            return self
                .menus
                .show(
                    chat,
                    session,
                    content::ADMIN_MENU,
                    Some(&content::admin_menu_keyboard()),
                    reuse,
                )
                .await;
        }
        let keyboard = self.main_menu_keyboard(chat).await?;
        self.menus
            .show(chat, session, content::MAIN_MENU, Some(&keyboard), reuse)
            .await
    }

    pub(crate) async fn main_menu_keyboard(
        &self,
        chat: &ChatId,
    ) -> Result<bureau_core::types::Keyboard, BureauError> {
        let confirmed = self
            .store
            .get_user(chat)
            .await?
            .map(|u| u.email_confirmed)
            .unwrap_or(false);
        Ok(content::main_menu_keyboard(confirmed))
    }

    /// Sends a plain informational message, swallowing transport failures.
    pub(crate) async fn send_note(&self, chat: &ChatId, text: &str) {
        if let Err(err) = self.transport.send_message(chat, text, None).await {
            warn!(chat = %chat, error = %err, "note delivery failed");
        }
    }

    /// Best-effort alert to the configured admin chat.
    pub(crate) async fn alert_admin(&self, text: &str) {
        if let Some(admin) = &self.admin_chat {
            if let Err(err) = self.transport.send_message(admin, text, None).await {
                warn!(error = %err, "admin alert delivery failed");
            }
        }
    }

    /// Prompts the next flow step: shows the question with a cancel button,
    /// reusing the pressed menu message when there is one.
    pub(crate) async fn prompt(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        text: &str,
        reuse: Option<&MessageRef>,
    ) -> Result<(), BureauError> {
        self.menus
            .show(chat, session, text, Some(&content::cancel_keyboard()), reuse)
            .await
    }

    /// Serializes the draft for the idempotency key, combined with the final
    /// free-text input of the step.
    pub(crate) fn draft_content(session: &SessionRecord, text: &str) -> String {
        let draft = serde_json::to_string(&session.draft).unwrap_or_default();
        format!("{draft}\u{1f}{text}")
    }

    async fn touch_user(&self, chat: &ChatId, profile: &SenderProfile) -> Result<(), BureauError> {
        let now = Utc::now().to_rfc3339();
        let user = match self.store.get_user(chat).await? {
            Some(mut user) => {
                if !profile.display_name.is_empty() {
                    user.display_name = profile.display_name.clone();
                }
                if profile.username.is_some() {
                    user.username = profile.username.clone();
                }
                user.last_active = now;
                user
            }
            None => {
                info!(chat = %chat, "first contact, creating user");
                User {
                    chat_id: chat.clone(),
                    display_name: profile.display_name.clone(),
                    username: profile.username.clone(),
                    email: None,
                    email_confirmed: false,
                    joined_at: now.clone(),
                    last_active: now,
                }
            }
        };
        self.store.upsert_user(&user).await
    }

    async fn load_session(&self, chat: &ChatId) -> Result<SessionRecord, BureauError> {
        Ok(self
            .store
            .get_session(chat)
            .await?
            .unwrap_or_else(|| SessionRecord::idle(chat.clone())))
    }

    /// Registers a commit attempt in the dedup ledger. `false` means this
    /// exact submission was already committed by an earlier delivery.
    pub(crate) async fn claim_submission(
        &self,
        chat: &ChatId,
        step: FlowStep,
        content: &str,
    ) -> Result<bool, BureauError> {
        let key = crate::dedup::idempotency_key(chat, step, content);
        self.store
            .try_insert_dedup_key(&key, &Utc::now().to_rfc3339())
            .await
    }

    /// Clears the flow and returns the user to the main menu with a leading
    /// confirmation text. Used at the end of every successful submission.
    pub(crate) async fn finish_flow(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        note: &str,
    ) -> Result<(), BureauError> {
        session.reset_flow();
        self.send_note(chat, note).await;
        self.show_main_menu(chat, session, None).await
    }

    pub(crate) fn require_nonempty(text: &str, what: &str) -> Result<String, BureauError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BureauError::Validation(format!(
                "Please send {what} as a text message."
            )));
        }
        Ok(trimmed.to_string())
    }
}
