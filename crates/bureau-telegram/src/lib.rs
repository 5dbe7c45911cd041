// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for the Bureau bot.
//!
//! Implements [`ChatTransport`] over the Telegram Bot API via teloxide long
//! polling. Inbound messages and callback queries are normalized into
//! [`ChatEvent`]s and pushed over an mpsc channel to the flow engine.

pub mod handler;

use async_trait::async_trait;
use bureau_config::model::TelegramConfig;
use bureau_core::types::{ChatEvent, ChatId, Keyboard, MessageRef};
use bureau_core::{BureauError, ChatTransport};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{MessageId, Recipient};
use teloxide::ApiError;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Telegram transport implementing [`ChatTransport`].
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Creates the transport. Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, BureauError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            BureauError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;
        if token.is_empty() {
            return Err(BureauError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Spawns the long-polling listener. Normalized events are pushed to
    /// `tx`; the task runs until the dispatcher stops.
    pub fn spawn_listener(&self, tx: mpsc::Sender<ChatEvent>) -> tokio::task::JoinHandle<()> {
        let bot = self.bot.clone();
        info!("starting Telegram long polling");

        tokio::spawn(async move {
            let message_tx = tx.clone();
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        match handler::message_to_event(&msg) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("event channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(chat_id = msg.chat.id.0, "ignoring unsupported message");
                            }
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(move |q: CallbackQuery| {
                    let tx = tx.clone();
                    async move {
                        match handler::callback_to_event(&q) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("event channel closed, dropping selection");
                                }
                            }
                            None => {
                                debug!("ignoring callback query without an attached message");
                            }
                        }
                        respond(())
                    }
                }));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .enable_ctrlc_handler()
                .build()
                .dispatch()
                .await;
            error!("Telegram dispatcher stopped");
        })
    }

    fn recipient(chat: &ChatId) -> Result<Recipient, BureauError> {
        let id: i64 = chat
            .0
            .parse()
            .map_err(|_| BureauError::transport(format!("invalid telegram chat id: {chat}")))?;
        Ok(Recipient::Id(teloxide::types::ChatId(id)))
    }

    fn message_id(message: &MessageRef) -> Result<MessageId, BureauError> {
        let id: i32 = message.0.parse().map_err(|_| {
            BureauError::transport(format!("invalid telegram message id: {}", message.0))
        })?;
        Ok(MessageId(id))
    }

    fn api_err(context: &str, e: teloxide::RequestError) -> BureauError {
        BureauError::Transport {
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, BureauError> {
        let recipient = Self::recipient(chat)?;
        let request = self.bot.send_message(recipient, text);
        let sent = match keyboard {
            Some(kb) => request.reply_markup(handler::to_inline_keyboard(kb)).await,
            None => request.await,
        }
        .map_err(|e| Self::api_err("send_message", e))?;
        Ok(MessageRef(sent.id.0.to_string()))
    }

    async fn edit_message(
        &self,
        chat: &ChatId,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BureauError> {
        let recipient = Self::recipient(chat)?;
        let id = Self::message_id(message)?;
        let request = self.bot.edit_message_text(recipient, id, text);
        let result = match keyboard {
            Some(kb) => request.reply_markup(handler::to_inline_keyboard(kb)).await,
            None => request.await,
        };
        match result {
            Ok(_) => Ok(()),
            // Re-rendering identical content is not a failure.
            Err(teloxide::RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(Self::api_err("edit_message", e)),
        }
    }

    async fn delete_message(
        &self,
        chat: &ChatId,
        message: &MessageRef,
    ) -> Result<(), BureauError> {
        let recipient = Self::recipient(chat)?;
        let id = Self::message_id(message)?;
        self.bot
            .delete_message(recipient, id)
            .await
            .map_err(|e| Self::api_err("delete_message", e))?;
        Ok(())
    }

    async fn answer_selection(&self, callback_id: &str) -> Result<(), BureauError> {
        self.bot
            .answer_callback_query(teloxide::types::CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(|e| Self::api_err("answer_selection", e))?;
        Ok(())
    }
}
