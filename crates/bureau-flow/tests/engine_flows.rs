// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end flow tests: real SQLite store, mock transport, full engine.

use std::sync::Arc;

use bureau_config::model::LimitsConfig;
use bureau_core::types::{
    ChatId, Draft, FlowStep, MenuAction, RequestKind, RequestStatus, SessionRecord, Ticket,
};
use bureau_core::{ChatTransport, Store};
use bureau_flow::dispatcher::Dispatcher;
use bureau_flow::tickets::TicketService;
use bureau_flow::{FlowEngine, SyncScan};
use bureau_test_utils::{selection_event, temp_store, text_event, Effect, MockTransport};
use chrono::Utc;
use tempfile::TempDir;

struct Harness {
    engine: FlowEngine,
    transport: Arc<MockTransport>,
    store: Arc<dyn Store>,
    dispatcher: Arc<Dispatcher>,
    tickets: Arc<TicketService>,
    _dir: TempDir,
}

const ADMIN: &str = "admin";

async fn harness() -> Harness {
    let (store, dir) = temp_store().await;
    let store: Arc<dyn Store> = Arc::new(store);
    let transport = Arc::new(MockTransport::new());
    let transport_dyn: Arc<dyn ChatTransport> = transport.clone();
    let dispatcher = Arc::new(Dispatcher::new(transport_dyn.clone(), store.clone(), 0));
    let tickets = Arc::new(TicketService::new(store.clone(), dispatcher.clone()));
    let limits = LimitsConfig {
        daily_limit: 3,
        batch_delay_ms: 0,
    };
    let engine = FlowEngine::new(
        store.clone(),
        transport_dyn,
        dispatcher.clone(),
        tickets.clone(),
        Some(ChatId(ADMIN.into())),
        &limits,
    );
    Harness {
        engine,
        transport,
        store,
        dispatcher,
        tickets,
        _dir: dir,
    }
}

fn chat(id: &str) -> ChatId {
    ChatId(id.to_string())
}

async fn menu_id(h: &Harness, id: &str) -> String {
    h.store
        .get_session(&chat(id))
        .await
        .unwrap()
        .and_then(|s| s.last_menu_id)
        .map(|m| m.0)
        .expect("tracked menu")
}

// --- First contact and menu lifecycle ---

#[tokio::test]
async fn first_text_creates_user_and_shows_main_menu() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hello")).await;

    let user = h.store.get_user(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(user.display_name, "Test User");
    assert!(!user.email_confirmed);

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert!(session.last_menu_id.is_some());
    assert!(session.step.is_idle());

    let texts = h.transport.sent_texts(&chat("u1"));
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("What would you like to do?"));
}

#[tokio::test]
async fn new_menu_supersedes_the_tracked_one() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let first = menu_id(&h, "u1").await;

    h.engine.handle_event(text_event("u1", "hi again")).await;
    let second = menu_id(&h, "u1").await;
    assert_ne!(first, second);

    // The old menu was deleted before the new one was sent.
    let effects = h.transport.effects();
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Delete { message, .. } if message.0 == first
    )));
}

#[tokio::test]
async fn selection_edits_the_pressed_message_in_place() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Invest))
        .await;

    let effects = h.transport.effects();
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Edit { message, .. } if message.0 == menu
    )));
    // No fresh send and no delete for this chat beyond the original menu.
    let sends = h.transport.sent_texts(&chat("u1"));
    assert_eq!(sends.len(), 1);
}

#[tokio::test]
async fn failed_edit_falls_back_to_fresh_send() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.transport.fail_edits(true);
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Invest))
        .await;

    let new_menu = menu_id(&h, "u1").await;
    assert_ne!(new_menu, menu);
    let texts = h.transport.sent_texts(&chat("u1"));
    assert!(texts.last().unwrap().contains("full name"));
}

// --- Email verification ---

#[tokio::test]
async fn email_verification_happy_path() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;
    h.engine
        .handle_event(text_event("u1", " Ada@Example.COM "))
        .await;
    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("ada@example.com"));

    // Confirmation is re-entry of the same address, case-insensitive.
    h.engine
        .handle_event(text_event("u1", "ADA@example.com"))
        .await;

    let user = h.store.get_user(&chat("u1")).await.unwrap().unwrap();
    assert!(user.email_confirmed);
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert!(session.step.is_idle());
    assert_eq!(session.draft, Draft::None);
}

#[tokio::test]
async fn mismatched_confirmation_returns_to_the_first_email_step() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;
    h.engine
        .handle_event(text_event("u1", "ada@example.com"))
        .await;

    h.engine
        .handle_event(text_event("u1", "other@example.com"))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmail);
    assert_eq!(session.draft, Draft::None);
    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("did not match"));
    let user = h.store.get_user(&chat("u1")).await.unwrap().unwrap();
    assert!(!user.email_confirmed);
}

#[tokio::test]
async fn malformed_email_leaves_the_step_in_place() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;

    h.engine.handle_event(text_event("u1", "not-an-email")).await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmail);
    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("valid email"));
}

#[tokio::test]
async fn email_owned_by_another_account_is_rejected() {
    let h = harness().await;
    // Seed another user who already confirmed this address.
    h.engine.handle_event(text_event("u2", "hi")).await;
    let mut other = h.store.get_user(&chat("u2")).await.unwrap().unwrap();
    other.email = Some("taken@example.com".into());
    other.email_confirmed = true;
    h.store.upsert_user(&other).await.unwrap();

    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;
    h.engine
        .handle_event(text_event("u1", "Taken@Example.com"))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmail);
    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn email_submissions_are_rate_limited() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;

    for i in 0..3 {
        let menu = menu_id(&h, "u1").await;
        h.engine
            .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
            .await;
        h.engine
            .handle_event(text_event("u1", &format!("try{i}@example.com")))
            .await;
    }
    // Fourth address submission inside the window is denied.
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;
    h.engine
        .handle_event(text_event("u1", "try4@example.com"))
        .await;

    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("too many times"));
    // The denial mutates nothing beyond the limiter row: the session keeps
    // the step it had when the denied input arrived.
    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmail);
}

#[tokio::test]
async fn transport_failure_mid_step_leaves_the_session_for_retry() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::VerifyEmail))
        .await;

    // The step handler fails after validation when no message can go out.
    h.transport.fail_sends_to(&chat("u1"));
    h.engine
        .handle_event(text_event("u1", "ada@example.com"))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmail);
    assert_eq!(session.draft, Draft::None);

    // Once the transport recovers, re-sending the same input resumes the flow.
    h.transport.clear_send_failures();
    h.engine
        .handle_event(text_event("u1", "ada@example.com"))
        .await;
    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingEmailConfirm);
}

// --- Support tickets ---

async fn verify_user(h: &Harness, id: &str, email: &str) {
    h.engine.handle_event(text_event(id, "hi")).await;
    let mut user = h.store.get_user(&chat(id)).await.unwrap().unwrap();
    user.email = Some(email.into());
    user.email_confirmed = true;
    h.store.upsert_user(&user).await.unwrap();
}

#[tokio::test]
async fn verified_user_skips_ticket_email_steps() {
    let h = harness().await;
    verify_user(&h, "u1", "ada@example.com").await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
        .await;
    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingTicketMessage);

    h.engine
        .handle_event(text_event("u1", "my deposit is missing"))
        .await;

    let tickets = h.store.list_tickets().await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].email, "ada@example.com");
    assert_eq!(tickets[0].message, "my deposit is missing");
    assert!(!tickets[0].notified);

    // Admin got an alert carrying a reply button.
    let admin_alert = h
        .transport
        .effects()
        .into_iter()
        .find_map(|e| match e {
            Effect::Send {
                chat: c,
                text,
                keyboard,
                ..
            } if c.0 == ADMIN => Some((text, keyboard)),
            _ => None,
        })
        .expect("admin alert");
    assert!(admin_alert.0.contains(&tickets[0].id));
    assert!(admin_alert.1.is_some());
}

#[tokio::test]
async fn unverified_user_confirms_email_inline() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
        .await;
    h.engine
        .handle_event(text_event("u1", "contact@example.com"))
        .await;
    h.engine
        .handle_event(text_event("u1", "Contact@Example.com"))
        .await;
    h.engine.handle_event(text_event("u1", "please help")).await;

    let tickets = h.store.list_tickets().await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].email, "contact@example.com");
    // Inline ticket email does not verify the account.
    let user = h.store.get_user(&chat("u1")).await.unwrap().unwrap();
    assert!(!user.email_confirmed);
}

#[tokio::test]
async fn mismatched_ticket_confirmation_restarts_the_email_step() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
        .await;
    h.engine
        .handle_event(text_event("u1", "contact@example.com"))
        .await;
    h.engine
        .handle_event(text_event("u1", "typo@example.com"))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert_eq!(session.step, FlowStep::AwaitingTicketEmail);
    assert_eq!(session.draft, Draft::None);
    assert_eq!(h.store.list_tickets().await.unwrap().len(), 0);
}

#[tokio::test]
async fn fourth_ticket_selection_in_window_is_denied() {
    let h = harness().await;
    verify_user(&h, "u1", "ada@example.com").await;

    for i in 0..3 {
        let menu = menu_id(&h, "u1").await;
        h.engine
            .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
            .await;
        h.engine
            .handle_event(text_event("u1", &format!("issue {i}")))
            .await;
    }
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
        .await;

    assert!(h
        .transport
        .last_text(&chat("u1"))
        .unwrap()
        .contains("too many tickets"));
    // No fourth row, and the denial leaves the idle session untouched.
    assert_eq!(h.store.list_tickets().await.unwrap().len(), 3);
    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert!(session.step.is_idle());
}

#[tokio::test]
async fn redelivered_submission_creates_no_second_ticket() {
    let h = harness().await;
    verify_user(&h, "u1", "ada@example.com").await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::SupportTicket))
        .await;

    // Snapshot the session as it was before the submission, then replay the
    // same text as if the event were delivered twice across a crash.
    let pending = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    h.engine.handle_event(text_event("u1", "double trouble")).await;
    h.store.save_session(&pending).await.unwrap();
    h.engine.handle_event(text_event("u1", "double trouble")).await;

    assert_eq!(h.store.list_tickets().await.unwrap().len(), 1);
}

// --- Invest and withdraw intake ---

#[tokio::test]
async fn invest_flow_records_a_pending_request() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Invest))
        .await;
    h.engine.handle_event(text_event("u1", "Ada Lovelace")).await;
    h.engine.handle_event(text_event("u1", "+1 555 0100")).await;
    h.engine.handle_event(text_event("u1", "2500 USD")).await;

    let requests = h.store.list_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let r = &requests[0];
    assert_eq!(r.kind, RequestKind::Invest);
    assert_eq!(r.full_name, "Ada Lovelace");
    assert_eq!(r.contact, "+1 555 0100");
    assert_eq!(r.amount, "2500 USD");
    assert_eq!(r.status, RequestStatus::Pending);
    assert!(!r.notified);
    assert!(r.id.starts_with("INV-"));

    assert!(h
        .transport
        .sent_texts(&chat(ADMIN))
        .iter()
        .any(|t| t.contains("Ada Lovelace")));
}

#[tokio::test]
async fn withdraw_flow_records_wallet_and_amount() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;

    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Withdraw))
        .await;
    h.engine.handle_event(text_event("u1", "Ada Lovelace")).await;
    h.engine.handle_event(text_event("u1", "0xABCDEF")).await;
    h.engine.handle_event(text_event("u1", "1.5 BTC")).await;

    let requests = h.store.list_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, RequestKind::Withdraw);
    assert_eq!(requests[0].contact, "0xABCDEF");
    assert!(requests[0].id.starts_with("WDR-"));
}

#[tokio::test]
async fn cancel_resets_the_flow() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Invest))
        .await;
    h.engine.handle_event(text_event("u1", "Ada")).await;

    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::Cancel))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert!(session.step.is_idle());
    assert_eq!(session.draft, Draft::None);
    assert_eq!(h.store.list_requests().await.unwrap().len(), 0);
}

// --- Admin flows ---

#[tokio::test]
async fn non_admin_admin_buttons_are_ignored() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let menu = menu_id(&h, "u1").await;
    h.engine
        .handle_event(selection_event("u1", &menu, MenuAction::AdminBroadcast))
        .await;

    let session = h.store.get_session(&chat("u1")).await.unwrap().unwrap();
    assert!(session.step.is_idle());
}

#[tokio::test]
async fn broadcast_reaches_all_users_and_isolates_failures() {
    let h = harness().await;
    for id in ["u1", "u2", "u3"] {
        h.engine.handle_event(text_event(id, "hi")).await;
    }
    h.transport.fail_sends_to(&chat("u2"));

    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(ADMIN, &menu, MenuAction::AdminBroadcast))
        .await;
    h.engine
        .handle_event(text_event(ADMIN, "maintenance tonight"))
        .await;

    assert!(h
        .transport
        .sent_texts(&chat("u1"))
        .iter()
        .any(|t| t == "maintenance tonight"));
    assert!(h
        .transport
        .sent_texts(&chat("u3"))
        .iter()
        .any(|t| t == "maintenance tonight"));

    // Ledger holds one row per successful delivery under a single batch id.
    let ledger = h.store.list_broadcasts().await.unwrap();
    let delivered: Vec<_> = ledger.iter().map(|e| e.chat_id.0.as_str()).collect();
    assert!(delivered.contains(&"u1") && delivered.contains(&"u3"));
    assert!(!delivered.contains(&"u2"));
    let batch = &ledger[0].batch_id;
    assert!(ledger.iter().all(|e| &e.batch_id == batch));

    let summary = h
        .transport
        .sent_texts(&chat(ADMIN))
        .iter()
        .find(|t| t.contains("Broadcast finished"))
        .cloned()
        .expect("summary");
    assert!(summary.contains("failed"));

    let session = h.store.get_session(&chat(ADMIN)).await.unwrap().unwrap();
    assert!(session.step.is_idle());
}

#[tokio::test]
async fn filtered_broadcast_targets_only_listed_ids() {
    let h = harness().await;
    for id in ["u1", "u2", "u3"] {
        h.engine.handle_event(text_event(id, "hi")).await;
    }

    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(
            ADMIN,
            &menu,
            MenuAction::AdminFilteredBroadcast,
        ))
        .await;
    h.engine.handle_event(text_event(ADMIN, "u1, u3")).await;
    h.engine.handle_event(text_event(ADMIN, "hello there")).await;

    assert!(h
        .transport
        .sent_texts(&chat("u1"))
        .iter()
        .any(|t| t == "hello there"));
    assert!(h
        .transport
        .sent_texts(&chat("u3"))
        .iter()
        .any(|t| t == "hello there"));
    assert!(!h
        .transport
        .sent_texts(&chat("u2"))
        .iter()
        .any(|t| t == "hello there"));
}

#[tokio::test]
async fn admin_reply_answers_and_notifies_once() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let ticket = Ticket {
        id: "TKT-1-abc".into(),
        chat_id: chat("u1"),
        email: "ada@example.com".into(),
        message: "where is my money".into(),
        answer: String::new(),
        created_at: Utc::now().to_rfc3339(),
        answered_at: None,
        notified: false,
    };
    h.store.insert_ticket(&ticket).await.unwrap();

    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(
            ADMIN,
            &menu,
            MenuAction::ReplyTicket("TKT-1-abc".into()),
        ))
        .await;
    h.engine
        .handle_event(text_event(ADMIN, "it arrives tomorrow"))
        .await;

    let stored = h.store.get_ticket("TKT-1-abc").await.unwrap().unwrap();
    assert_eq!(stored.answer, "it arrives tomorrow");
    assert!(stored.answered_at.is_some());
    assert!(stored.notified);
    assert!(h
        .transport
        .sent_texts(&chat("u1"))
        .iter()
        .any(|t| t.contains("it arrives tomorrow")));
}

#[tokio::test]
async fn failed_answer_delivery_stays_unnotified_until_sync() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;
    let ticket = Ticket {
        id: "TKT-2-def".into(),
        chat_id: chat("u1"),
        email: "ada@example.com".into(),
        message: "help".into(),
        answer: String::new(),
        created_at: Utc::now().to_rfc3339(),
        answered_at: None,
        notified: false,
    };
    h.store.insert_ticket(&ticket).await.unwrap();
    h.transport.fail_sends_to(&chat("u1"));

    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(
            ADMIN,
            &menu,
            MenuAction::ReplyTicket("TKT-2-def".into()),
        ))
        .await;
    h.engine.handle_event(text_event(ADMIN, "answered")).await;

    let stored = h.store.get_ticket("TKT-2-def").await.unwrap().unwrap();
    assert_eq!(stored.answer, "answered");
    assert!(!stored.notified);

    // The user becomes reachable again; a sync scan delivers the answer.
    h.transport.clear_send_failures();
    let scan = SyncScan::new(h.store.clone(), h.dispatcher.clone(), h.tickets.clone());
    let report = scan.run().await.unwrap();
    assert_eq!(report.tickets_notified, 1);
    assert!(h
        .store
        .get_ticket("TKT-2-def")
        .await
        .unwrap()
        .unwrap()
        .notified);

    // A second scan finds nothing to do.
    let report = scan.run().await.unwrap();
    assert_eq!(report.tickets_notified, 0);
}

#[tokio::test]
async fn reply_to_missing_ticket_resets_the_admin_flow() {
    let h = harness().await;
    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(
            ADMIN,
            &menu,
            MenuAction::ReplyTicket("TKT-gone".into()),
        ))
        .await;

    assert!(h
        .transport
        .last_text(&chat(ADMIN))
        .unwrap()
        .contains("no longer exists"));
    let session = h.store.get_session(&chat(ADMIN)).await.unwrap().unwrap();
    assert!(session.step.is_idle());
}

#[tokio::test]
async fn sync_scan_notifies_reviewed_requests() {
    let h = harness().await;
    h.engine.handle_event(text_event("u1", "hi")).await;

    let mut session = SessionRecord::idle(chat("u1"));
    session.updated_at = Utc::now().to_rfc3339();
    h.store.save_session(&session).await.unwrap();

    let request = bureau_core::types::Request {
        id: "INV-1-abc".into(),
        kind: RequestKind::Invest,
        chat_id: chat("u1"),
        full_name: "Ada".into(),
        contact: "c".into(),
        amount: "100".into(),
        status: RequestStatus::Accepted,
        notified: false,
        created_at: Utc::now().to_rfc3339(),
    };
    h.store.insert_request(&request).await.unwrap();

    let scan = SyncScan::new(h.store.clone(), h.dispatcher.clone(), h.tickets.clone());
    let report = scan.run().await.unwrap();
    assert_eq!(report.requests_notified, 1);

    assert!(h
        .transport
        .sent_texts(&chat("u1"))
        .iter()
        .any(|t| t.contains("accepted")));
    assert!(h
        .store
        .get_request("INV-1-abc")
        .await
        .unwrap()
        .unwrap()
        .notified);
}

#[tokio::test]
async fn admin_stats_render_counts() {
    let h = harness().await;
    for id in ["u1", "u2"] {
        h.engine.handle_event(text_event(id, "hi")).await;
    }
    let ticket = Ticket {
        id: "TKT-3".into(),
        chat_id: chat("u1"),
        email: "a@b.com".into(),
        message: "m".into(),
        answer: String::new(),
        created_at: Utc::now().to_rfc3339(),
        answered_at: None,
        notified: false,
    };
    h.store.insert_ticket(&ticket).await.unwrap();

    h.engine.handle_event(text_event(ADMIN, "hi")).await;
    let menu = menu_id(&h, ADMIN).await;
    h.engine
        .handle_event(selection_event(ADMIN, &menu, MenuAction::AdminStats))
        .await;

    let text = h.transport.last_text(&chat(ADMIN)).unwrap();
    assert!(text.contains("Users: 3"));
    assert!(text.contains("Open tickets: 1"));
}
