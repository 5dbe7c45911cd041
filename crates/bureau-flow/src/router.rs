// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event routing: one enum, one match, no chained string comparisons.
//!
//! Resolution order for text events is admin flow step (admin chat only),
//! then the user's active flow step, then the default main-menu fallback.
//! Selections resolve purely by their decoded action; undecodable callback
//! data (stale keyboards from an older build) is ignored.

use bureau_core::types::{ChatEvent, FlowStep, MenuAction, SessionRecord};

/// Where an inbound event goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Text consumed by an admin-only flow step.
    AdminStep(FlowStep),
    /// A decoded menu selection.
    Selection(MenuAction),
    /// Text consumed by the user's active flow step.
    UserStep(FlowStep),
    /// Text outside any flow: show the main menu.
    MainMenu,
    /// Nothing to do (undecodable selection).
    Ignore,
}

fn is_admin_step(step: FlowStep) -> bool {
    matches!(
        step,
        FlowStep::AwaitingBroadcastMessage
            | FlowStep::AwaitingFilteredIds
            | FlowStep::AwaitingFilteredMessage
            | FlowStep::AwaitingTicketReply
    )
}

pub fn resolve(event: &ChatEvent, session: &SessionRecord, is_admin: bool) -> Route {
    match event {
        ChatEvent::Selection { action, .. } => match action {
            Some(action) => Route::Selection(action.clone()),
            None => Route::Ignore,
        },
        ChatEvent::Text { .. } => {
            if is_admin && is_admin_step(session.step) {
                Route::AdminStep(session.step)
            } else if !session.step.is_idle() && !is_admin_step(session.step) {
                Route::UserStep(session.step)
            } else {
                Route::MainMenu
            }
        }
    }
}
