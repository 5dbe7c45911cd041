// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message texts and keyboard layouts.
//!
//! All copy lives here so the flow logic stays free of strings and the texts
//! can be reviewed in one place.

use bureau_core::types::{Button, Keyboard, MenuAction, RequestKind, StatsSnapshot, Ticket};

// --- Keyboards ---

pub fn main_menu_keyboard(email_confirmed: bool) -> Keyboard {
    let mut buttons = Vec::new();
    if !email_confirmed {
        buttons.push(Button::action("Verify email", MenuAction::VerifyEmail));
    }
    buttons.push(Button::action("Support ticket", MenuAction::SupportTicket));
    buttons.push(Button::action("Invest", MenuAction::Invest));
    buttons.push(Button::action("Withdraw", MenuAction::Withdraw));
    Keyboard::column(buttons)
}

pub fn cancel_keyboard() -> Keyboard {
    Keyboard::column(vec![Button::action("Cancel", MenuAction::Cancel)])
}

pub fn admin_menu_keyboard() -> Keyboard {
    Keyboard::column(vec![
        Button::action("Broadcast to everyone", MenuAction::AdminBroadcast),
        Button::action("Broadcast to selected users", MenuAction::AdminFilteredBroadcast),
        Button::action("Stats", MenuAction::AdminStats),
    ])
}

pub fn ticket_reply_keyboard(ticket_id: &str) -> Keyboard {
    Keyboard::column(vec![Button::action(
        "Reply",
        MenuAction::ReplyTicket(ticket_id.to_string()),
    )])
}

// --- Plain texts ---

pub const MAIN_MENU: &str = "Welcome! What would you like to do?";
pub const ADMIN_MENU: &str = "Admin panel.";
pub const FLOW_CANCELLED: &str = "Cancelled. Back to the main menu.";

pub const ASK_EMAIL: &str = "Please send the email address you want to verify.";
pub const EMAIL_INVALID: &str = "That does not look like a valid email address. Please try again.";
pub const EMAIL_TAKEN: &str =
    "That email address is already registered to another account.";
pub const EMAIL_ALREADY_CONFIRMED: &str = "Your email is already verified.";
pub const EMAIL_MISMATCH: &str =
    "The addresses did not match. Please send your email address again.";
pub const EMAIL_CONFIRMED: &str = "Your email address has been verified. Thank you!";
pub const EMAIL_RATE_LIMITED: &str =
    "You have requested email verification too many times today. Please try again tomorrow.";

pub const ASK_TICKET_EMAIL: &str = "Please send your contact email for this ticket.";
pub const ASK_TICKET_MESSAGE: &str = "Describe your issue in one message.";
pub const TICKET_RATE_LIMITED: &str =
    "You have opened too many tickets today. Please try again tomorrow.";
pub const TICKET_DUPLICATE: &str = "This ticket was already submitted.";

pub const ASK_INVEST_NAME: &str = "Investment request. What is your full name?";
pub const ASK_INVEST_CONTACT: &str = "What is your transaction contact (phone or email)?";
pub const ASK_INVEST_AMOUNT: &str = "What amount would you like to invest?";
pub const ASK_WITHDRAW_NAME: &str = "Withdrawal request. What is your full name?";
pub const ASK_WITHDRAW_WALLET: &str = "What wallet address should we send to?";
pub const ASK_WITHDRAW_AMOUNT: &str = "What amount would you like to withdraw?";

pub const ASK_BROADCAST_MESSAGE: &str = "Send the message to broadcast to all users.";
pub const ASK_FILTERED_IDS: &str =
    "Send the recipient chat ids, separated by commas or whitespace.";
pub const ASK_FILTERED_MESSAGE: &str = "Send the message for the selected recipients.";
pub const FILTERED_IDS_EMPTY: &str = "No recipient ids found in that message. Please try again.";
pub const ASK_TICKET_ANSWER: &str = "Send your answer for this ticket.";
pub const TICKET_REPLY_GONE: &str = "That ticket no longer exists.";

pub const RECORD_GONE: &str = "That record no longer exists.";
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

// --- Formatted texts ---

pub fn confirm_email(email: &str) -> String {
    format!("You entered {email}. Please type it once more to confirm.")
}

pub fn ticket_created(id: &str) -> String {
    format!("Your ticket {id} has been created. We will reply here as soon as it is answered.")
}

pub fn ticket_answer(ticket: &Ticket) -> String {
    format!(
        "Your ticket {} has been answered:\n\n{}",
        ticket.id, ticket.answer
    )
}

pub fn ticket_admin_alert(ticket: &Ticket, display_name: &str) -> String {
    format!(
        "New ticket {} from {} ({})\nEmail: {}\n\n{}",
        ticket.id, display_name, ticket.chat_id, ticket.email, ticket.message
    )
}

pub fn ticket_answer_sent(id: &str) -> String {
    format!("Answer for {id} delivered.")
}

pub fn request_created(kind: RequestKind, id: &str) -> String {
    let noun = match kind {
        RequestKind::Invest => "investment",
        RequestKind::Withdraw => "withdrawal",
    };
    format!("Your {noun} request {id} has been recorded. We will notify you once it is reviewed.")
}

pub fn request_admin_alert(
    kind: RequestKind,
    id: &str,
    display_name: &str,
    chat_id: &str,
    full_name: &str,
    contact: &str,
    amount: &str,
) -> String {
    let noun = match kind {
        RequestKind::Invest => "investment",
        RequestKind::Withdraw => "withdrawal",
    };
    let contact_label = match kind {
        RequestKind::Invest => "Contact",
        RequestKind::Withdraw => "Wallet",
    };
    format!(
        "New {noun} request {id} from {display_name} ({chat_id})\nName: {full_name}\n{contact_label}: {contact}\nAmount: {amount}"
    )
}

pub fn request_status_update(kind: RequestKind, id: &str, status: &str) -> String {
    let noun = match kind {
        RequestKind::Invest => "investment",
        RequestKind::Withdraw => "withdrawal",
    };
    format!("Your {noun} request {id} has been reviewed: {status}.")
}

pub fn broadcast_summary(sent: u64, failed: u64) -> String {
    format!("Broadcast finished: {sent} delivered, {failed} failed.")
}

pub fn admin_failure_alert(chat_id: &str, error: &str) -> String {
    format!("Handler failure for chat {chat_id}: {error}")
}

pub fn stats_text(stats: &StatsSnapshot) -> String {
    format!(
        "Users: {}\nActive in the last 7 days: {}\nOpen tickets: {}\nClosed tickets: {}",
        stats.total_users, stats.active_last_7_days, stats.open_tickets, stats.closed_tickets
    )
}
