// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test fixtures shared across the Bureau workspace: an in-memory
//! [`MockTransport`] that records every outbound effect in order, and a
//! throwaway SQLite store backed by a temp directory.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use bureau_config::model::StorageConfig;
use bureau_core::types::{ChatEvent, ChatId, Keyboard, MenuAction, MessageRef, SenderProfile};
use bureau_core::{BureauError, ChatTransport};
use bureau_storage::SqliteStore;
use tempfile::TempDir;

/// One recorded outbound effect, in the order the code under test produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
        message: MessageRef,
    },
    Edit {
        chat: ChatId,
        message: MessageRef,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Delete {
        chat: ChatId,
        message: MessageRef,
    },
    Answer {
        callback_id: String,
    },
}

#[derive(Default)]
struct MockState {
    effects: Vec<Effect>,
    next_id: u64,
    fail_sends_to: HashSet<ChatId>,
    fail_edits: bool,
    fail_deletes: bool,
}

/// Chat transport that records effects instead of talking to a network.
///
/// Message ids are handed out sequentially starting at `"m1"`. Failure
/// injection is per-concern: sends fail per recipient, edits and deletes
/// fail globally once toggled.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future send to `chat` fail.
    pub fn fail_sends_to(&self, chat: &ChatId) {
        self.state.lock().unwrap().fail_sends_to.insert(chat.clone());
    }

    /// Clears all per-recipient send failures.
    pub fn clear_send_failures(&self) {
        self.state.lock().unwrap().fail_sends_to.clear();
    }

    pub fn fail_edits(&self, fail: bool) {
        self.state.lock().unwrap().fail_edits = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    /// Everything recorded so far, in order.
    pub fn effects(&self) -> Vec<Effect> {
        self.state.lock().unwrap().effects.clone()
    }

    /// Texts of successful sends to one chat, in order.
    pub fn sent_texts(&self, chat: &ChatId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send { chat: c, text, .. } if c == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent send or edit text delivered to one chat.
    pub fn last_text(&self, chat: &ChatId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .effects
            .iter()
            .rev()
            .find_map(|e| match e {
                Effect::Send { chat: c, text, .. } | Effect::Edit { chat: c, text, .. }
                    if c == chat =>
                {
                    Some(text.clone())
                }
                _ => None,
            })
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, BureauError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends_to.contains(chat) {
            return Err(BureauError::transport(format!("send to {chat} blocked")));
        }
        state.next_id += 1;
        let message = MessageRef(format!("m{}", state.next_id));
        state.effects.push(Effect::Send {
            chat: chat.clone(),
            text: text.to_string(),
            keyboard: keyboard.cloned(),
            message: message.clone(),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        chat: &ChatId,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BureauError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_edits {
            return Err(BureauError::transport("edit blocked"));
        }
        state.effects.push(Effect::Edit {
            chat: chat.clone(),
            message: message.clone(),
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        chat: &ChatId,
        message: &MessageRef,
    ) -> Result<(), BureauError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(BureauError::transport("delete blocked"));
        }
        state.effects.push(Effect::Delete {
            chat: chat.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn answer_selection(&self, callback_id: &str) -> Result<(), BureauError> {
        self.state.lock().unwrap().effects.push(Effect::Answer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}

/// An initialized [`SqliteStore`] on a temp directory. Keep the returned
/// [`TempDir`] alive for the duration of the test.
pub async fn temp_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::new(StorageConfig {
        database_path: dir
            .path()
            .join("bureau-test.db")
            .to_str()
            .expect("utf8 path")
            .to_string(),
        wal_mode: true,
    });
    store.initialize().await.expect("store init");
    (store, dir)
}

// --- Event builders ---

pub fn profile(name: &str) -> SenderProfile {
    SenderProfile {
        display_name: name.to_string(),
        username: None,
    }
}

pub fn text_event(chat: &str, text: &str) -> ChatEvent {
    ChatEvent::Text {
        chat: ChatId(chat.to_string()),
        profile: profile("Test User"),
        text: text.to_string(),
    }
}

pub fn selection_event(chat: &str, message_id: &str, action: MenuAction) -> ChatEvent {
    ChatEvent::Selection {
        chat: ChatId(chat.to_string()),
        profile: profile("Test User"),
        message_id: MessageRef(message_id.to_string()),
        callback_id: format!("cb-{message_id}"),
        action: Some(action),
    }
}
