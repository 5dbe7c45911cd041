// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Bureau workspace.
//!
//! Rows persisted by the storage layer (one flat table per type), the flow
//! position and draft enums carried in a session, and the channel-agnostic
//! inbound/outbound message shapes used at the transport seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat identifier -- the identity key for a user. One logical owner per
/// session is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a delivered chat message, used to track and later edit or
/// delete the single active menu message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef(pub String);

impl std::fmt::Display for MessageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Flow position ---

/// Position of a user within a multi-message guided flow.
///
/// `Idle` means no active flow and round-trips through the store as the empty
/// string. Flows never nest: at most one non-idle step per user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    #[strum(serialize = "")]
    Idle,
    AwaitingEmail,
    AwaitingEmailConfirm,
    AwaitingTicketEmail,
    AwaitingTicketEmailConfirm,
    AwaitingTicketMessage,
    AwaitingInvestName,
    AwaitingInvestContact,
    AwaitingInvestAmount,
    AwaitingWithdrawName,
    AwaitingWithdrawWallet,
    AwaitingWithdrawAmount,
    AwaitingBroadcastMessage,
    AwaitingFilteredIds,
    AwaitingFilteredMessage,
    AwaitingTicketReply,
}

impl FlowStep {
    /// Parses a stored step string. Unknown values fall back to `Idle` so a
    /// corrupted row can never wedge a session.
    pub fn parse(s: &str) -> FlowStep {
        s.parse().unwrap_or(FlowStep::Idle)
    }

    /// True when no flow is active.
    pub fn is_idle(self) -> bool {
        self == FlowStep::Idle
    }
}

// --- Draft state ---

/// Partial, not-yet-committed input accumulated across the steps of one flow.
///
/// Serialized as tagged JSON into the session's single draft cell. This
/// replaces the legacy delimiter-joined `tempData` string and absorbs the old
/// auxiliary `tempEmail` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Draft {
    #[default]
    None,
    /// Email submitted in the registration flow, awaiting confirmation.
    Register { email: String },
    /// Ticket flow: the email (confirmed inline or pre-verified) collected
    /// before the message body step.
    Ticket { email: String },
    /// Investment intake, filled field by field.
    Invest {
        full_name: Option<String>,
        contact: Option<String>,
    },
    /// Withdrawal intake, filled field by field.
    Withdraw {
        full_name: Option<String>,
        wallet: Option<String>,
    },
    /// Ticket id the admin is currently composing an answer for.
    TicketReply { ticket_id: String },
    /// Recipient list collected for a filtered broadcast.
    FilteredBroadcast { recipients: Vec<String> },
}

// --- Persisted rows ---

/// A known chat user. Created on first event from a new identity, mutated on
/// every event (`last_active`) and on email confirmation, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub chat_id: ChatId,
    pub display_name: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub email_confirmed: bool,
    /// RFC 3339 timestamp of first contact.
    pub joined_at: String,
    /// RFC 3339 timestamp of the most recent inbound event.
    pub last_active: String,
}

/// Per-user conversation state. One row per user, keyed by chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub chat_id: ChatId,
    pub step: FlowStep,
    pub draft: Draft,
    /// The single tracked interactive menu message, if one is live.
    pub last_menu_id: Option<MessageRef>,
    pub updated_at: String,
}

impl SessionRecord {
    /// A fresh idle session for a user with no prior row.
    pub fn idle(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            step: FlowStep::Idle,
            draft: Draft::None,
            last_menu_id: None,
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Clears flow position and draft, keeping the tracked menu message.
    pub fn reset_flow(&mut self) {
        self.step = FlowStep::Idle;
        self.draft = Draft::None;
    }
}

/// A support ticket. Created by the ticket-submission flow, answered by the
/// admin reply path or the sync scan, never deleted.
///
/// Invariant: `notified` only transitions false -> true, and only after a
/// non-empty `answer` exists and a delivery attempt was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub chat_id: ChatId,
    pub email: String,
    pub message: String,
    /// Empty until answered.
    pub answer: String,
    pub created_at: String,
    pub answered_at: Option<String>,
    pub notified: bool,
}

impl Ticket {
    /// True when an answer exists but the owner has not been pushed it yet.
    pub fn needs_notification(&self) -> bool {
        !self.answer.is_empty() && !self.notified
    }
}

/// The kind of an intake request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Invest,
    Withdraw,
}

/// Review status of an intake request. Anything other than `Pending` is
/// terminal and eligible for owner notification.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    /// Any other terminal status an admin wrote by hand.
    #[strum(default)]
    Other(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

/// An investment or withdrawal intake request awaiting human review.
/// Same notify-once invariant as [`Ticket`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub kind: RequestKind,
    pub chat_id: ChatId,
    pub full_name: String,
    /// Transaction contact for invest, wallet address for withdraw.
    pub contact: String,
    pub amount: String,
    pub status: RequestStatus,
    pub notified: bool,
    pub created_at: String,
}

impl Request {
    /// True when review finished but the owner has not been told.
    pub fn needs_notification(&self) -> bool {
        !self.status.is_pending() && !self.notified
    }
}

/// An action subject to the 24h sliding-window rate limiter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LimitedAction {
    TicketCreate,
    EmailSend,
}

/// Per-identity, per-action counter row for the rate limiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitCounter {
    pub chat_id: ChatId,
    pub action: LimitedAction,
    pub count: u32,
    pub last_action_at: DateTime<Utc>,
}

/// One row of the append-only broadcast delivery ledger. Never mutated except
/// the `deleted` flag (retraction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEntry {
    pub batch_id: String,
    pub chat_id: ChatId,
    pub message_id: MessageRef,
    pub sent_at: String,
    pub deleted: bool,
}

/// Aggregate counts served by the admin stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_users: u64,
    pub active_last_7_days: u64,
    pub open_tickets: u64,
    pub closed_tickets: u64,
}

// --- Inbound events and outbound keyboards ---

/// Profile fields carried on an inbound event, used to upsert the User row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderProfile {
    pub display_name: String,
    pub username: Option<String>,
}

/// A discrete menu selection, decoded from opaque callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    MainMenu,
    VerifyEmail,
    SupportTicket,
    Invest,
    Withdraw,
    Cancel,
    AdminBroadcast,
    AdminFilteredBroadcast,
    AdminStats,
    /// Admin pressed "reply" on a ticket notification; carries the ticket id.
    ReplyTicket(String),
}

impl MenuAction {
    /// Encodes the action as callback data.
    pub fn encode(&self) -> String {
        match self {
            MenuAction::MainMenu => "main_menu".into(),
            MenuAction::VerifyEmail => "verify_email".into(),
            MenuAction::SupportTicket => "support_ticket".into(),
            MenuAction::Invest => "invest".into(),
            MenuAction::Withdraw => "withdraw".into(),
            MenuAction::Cancel => "cancel".into(),
            MenuAction::AdminBroadcast => "admin_broadcast".into(),
            MenuAction::AdminFilteredBroadcast => "admin_filtered".into(),
            MenuAction::AdminStats => "admin_stats".into(),
            MenuAction::ReplyTicket(id) => format!("reply_ticket:{id}"),
        }
    }

    /// Decodes callback data. Unknown payloads return `None` and are ignored
    /// by the router (stale keyboards from old bot versions).
    pub fn decode(data: &str) -> Option<MenuAction> {
        if let Some(id) = data.strip_prefix("reply_ticket:") {
            if id.is_empty() {
                return None;
            }
            return Some(MenuAction::ReplyTicket(id.to_string()));
        }
        match data {
            "main_menu" => Some(MenuAction::MainMenu),
            "verify_email" => Some(MenuAction::VerifyEmail),
            "support_ticket" => Some(MenuAction::SupportTicket),
            "invest" => Some(MenuAction::Invest),
            "withdraw" => Some(MenuAction::Withdraw),
            "cancel" => Some(MenuAction::Cancel),
            "admin_broadcast" => Some(MenuAction::AdminBroadcast),
            "admin_filtered" => Some(MenuAction::AdminFilteredBroadcast),
            "admin_stats" => Some(MenuAction::AdminStats),
            _ => None,
        }
    }
}

/// One inbound chat event, already normalized from the transport.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Free text from the user.
    Text {
        chat: ChatId,
        profile: SenderProfile,
        text: String,
    },
    /// A discrete menu selection (inline button press).
    Selection {
        chat: ChatId,
        profile: SenderProfile,
        /// The message the pressed keyboard is attached to.
        message_id: MessageRef,
        /// Transport acknowledgement handle for the selection.
        callback_id: String,
        action: Option<MenuAction>,
    },
}

impl ChatEvent {
    /// The identity this event belongs to.
    pub fn chat(&self) -> &ChatId {
        match self {
            ChatEvent::Text { chat, .. } | ChatEvent::Selection { chat, .. } => chat,
        }
    }

    /// Sender profile fields for the User upsert.
    pub fn profile(&self) -> &SenderProfile {
        match self {
            ChatEvent::Text { profile, .. } | ChatEvent::Selection { profile, .. } => profile,
        }
    }
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonPress {
    /// Emits a [`MenuAction`] selection back to the bot.
    Action(MenuAction),
    /// Opens an external URL.
    Url(String),
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub press: ButtonPress,
}

impl Button {
    pub fn action(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            press: ButtonPress::Action(action),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            press: ButtonPress::Url(url.into()),
        }
    }
}

/// An inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// One button per row.
    pub fn column(buttons: Vec<Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_step_round_trips_through_strings() {
        assert_eq!(FlowStep::Idle.to_string(), "");
        assert_eq!(FlowStep::AwaitingEmail.to_string(), "awaiting_email");
        assert_eq!(FlowStep::parse("awaiting_email"), FlowStep::AwaitingEmail);
        assert_eq!(
            FlowStep::parse("awaiting_ticket_reply"),
            FlowStep::AwaitingTicketReply
        );
        assert_eq!(FlowStep::parse(""), FlowStep::Idle);
    }

    #[test]
    fn unknown_step_falls_back_to_idle() {
        assert_eq!(FlowStep::parse("no_such_step"), FlowStep::Idle);
    }

    #[test]
    fn id_newtypes_display_the_inner_value() {
        assert_eq!(ChatId("42".into()).to_string(), "42");
        assert_eq!(MessageRef("m-7".into()).to_string(), "m-7");
    }

    #[test]
    fn draft_serializes_tagged() {
        let draft = Draft::Register {
            email: "a@b.com".into(),
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains(r#""kind":"register""#));
        let back: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn menu_action_encode_decode() {
        let actions = [
            MenuAction::MainMenu,
            MenuAction::SupportTicket,
            MenuAction::Invest,
            MenuAction::AdminFilteredBroadcast,
            MenuAction::ReplyTicket("TKT-1700000000-abc123".into()),
        ];
        for action in actions {
            assert_eq!(MenuAction::decode(&action.encode()), Some(action));
        }
    }

    #[test]
    fn menu_action_rejects_garbage() {
        assert_eq!(MenuAction::decode("not_a_thing"), None);
        assert_eq!(MenuAction::decode("reply_ticket:"), None);
    }

    #[test]
    fn request_status_accepts_hand_written_terminal_states() {
        let status: RequestStatus = "escalated".parse().unwrap();
        assert_eq!(status, RequestStatus::Other("escalated".into()));
        assert!(!status.is_pending());
    }

    #[test]
    fn ticket_needs_notification_requires_answer() {
        let mut t = Ticket {
            id: "TKT-1".into(),
            chat_id: ChatId("1".into()),
            email: "a@b.com".into(),
            message: "help".into(),
            answer: String::new(),
            created_at: "2026-01-01T00:00:00Z".into(),
            answered_at: None,
            notified: false,
        };
        assert!(!t.needs_notification());
        t.answer = "done".into();
        assert!(t.needs_notification());
        t.notified = true;
        assert!(!t.needs_notification());
    }
}
