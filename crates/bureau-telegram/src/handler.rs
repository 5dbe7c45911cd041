// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization between Telegram updates and channel-agnostic events.
//!
//! Only private-chat text messages and callback queries become events;
//! group messages, media, and callback queries whose message has become
//! inaccessible are dropped.

use bureau_core::types::{
    Button, ButtonPress, ChatEvent, ChatId, Keyboard, MenuAction, MessageRef, SenderProfile,
};
use teloxide::types::{
    CallbackQuery, ChatKind, InlineKeyboardButton, InlineKeyboardMarkup, Message, User,
};
use tracing::debug;

/// True for private (DM) chats. Group, supergroup, and channel messages are
/// not handled by this bot.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

fn profile_of(user: &User) -> SenderProfile {
    let mut display_name = user.first_name.clone();
    if let Some(last) = &user.last_name {
        display_name.push(' ');
        display_name.push_str(last);
    }
    SenderProfile {
        display_name,
        username: user.username.clone(),
    }
}

/// Converts a Telegram message into a [`ChatEvent::Text`]. Returns `None`
/// for non-DM chats and non-text content.
pub fn message_to_event(msg: &Message) -> Option<ChatEvent> {
    if !is_dm(msg) {
        return None;
    }
    let text = msg.text()?;
    let profile = msg.from.as_ref().map(profile_of).unwrap_or_default();
    Some(ChatEvent::Text {
        chat: ChatId(msg.chat.id.0.to_string()),
        profile,
        text: text.to_string(),
    })
}

/// Converts a callback query into a [`ChatEvent::Selection`]. Returns `None`
/// when the pressed keyboard's message is no longer accessible, since the
/// menu lifecycle needs the message id to edit in place.
pub fn callback_to_event(q: &CallbackQuery) -> Option<ChatEvent> {
    let message = q.message.as_ref()?;
    let action = q.data.as_deref().and_then(MenuAction::decode);
    if action.is_none() {
        debug!(data = ?q.data, "callback data did not decode to a menu action");
    }
    Some(ChatEvent::Selection {
        chat: ChatId(message.chat().id.0.to_string()),
        profile: profile_of(&q.from),
        message_id: MessageRef(message.id().0.to_string()),
        callback_id: q.id.to_string(),
        action,
    })
}

/// Renders our keyboard model as a Telegram inline keyboard.
pub fn to_inline_keyboard(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows = keyboard.rows.iter().map(|row| {
        row.iter()
            .filter_map(|button| to_inline_button(button))
            .collect::<Vec<_>>()
    });
    InlineKeyboardMarkup::new(rows)
}

fn to_inline_button(button: &Button) -> Option<InlineKeyboardButton> {
    match &button.press {
        ButtonPress::Action(action) => Some(InlineKeyboardButton::callback(
            button.label.clone(),
            action.encode(),
        )),
        ButtonPress::Url(url) => match url.parse() {
            Ok(url) => Some(InlineKeyboardButton::url(button.label.clone(), url)),
            Err(e) => {
                debug!(url, error = %e, "dropping button with unparseable url");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching Telegram Bot
    /// API structure.
    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": "adal",
            },
            "text": text,
        });
        serde_json::from_value(json).expect("mock message")
    }

    fn make_group_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": 1u64,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });
        serde_json::from_value(json).expect("mock group message")
    }

    #[test]
    fn private_text_becomes_an_event() {
        let msg = make_private_message(42, "hello");
        let event = message_to_event(&msg).expect("event");
        let ChatEvent::Text { chat, profile, text } = event else {
            panic!("expected text event");
        };
        assert_eq!(chat.0, "42");
        assert_eq!(text, "hello");
        assert_eq!(profile.display_name, "Ada Lovelace");
        assert_eq!(profile.username.as_deref(), Some("adal"));
    }

    #[test]
    fn group_messages_are_dropped() {
        let msg = make_group_message("hello");
        assert!(message_to_event(&msg).is_none());
    }

    #[test]
    fn keyboard_rows_survive_conversion() {
        let keyboard = Keyboard::column(vec![
            Button::action("Invest", MenuAction::Invest),
            Button::action("Cancel", MenuAction::Cancel),
        ]);
        let markup = to_inline_keyboard(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Invest");
    }

    #[test]
    fn buttons_with_bad_urls_are_dropped() {
        let keyboard = Keyboard {
            rows: vec![vec![
                Button::url("Site", "https://example.com"),
                Button::url("Broken", "not a url"),
            ]],
        };
        let markup = to_inline_keyboard(&keyboard);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
    }
}
