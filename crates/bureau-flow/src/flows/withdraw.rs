// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Withdrawal intake: name, wallet, amount. Mirrors the investment flow and
//! shares its submission tail.

use bureau_core::types::{ChatId, Draft, FlowStep, MessageRef, RequestKind, SessionRecord};
use bureau_core::BureauError;

use crate::content;
use crate::engine::FlowEngine;

impl FlowEngine {
    pub(crate) async fn start_withdraw(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        message_id: &MessageRef,
    ) -> Result<(), BureauError> {
        session.step = FlowStep::AwaitingWithdrawName;
        session.draft = Draft::Withdraw {
            full_name: None,
            wallet: None,
        };
        self.prompt(chat, session, content::ASK_WITHDRAW_NAME, Some(message_id))
            .await
    }

    pub(crate) async fn on_withdraw_step(
        &self,
        chat: &ChatId,
        session: &mut SessionRecord,
        step: FlowStep,
        text: &str,
    ) -> Result<(), BureauError> {
        let Draft::Withdraw { full_name, wallet } = session.draft.clone() else {
            session.reset_flow();
            return self.show_main_menu(chat, session, None).await;
        };

        match step {
            FlowStep::AwaitingWithdrawName => {
                let name = Self::require_nonempty(text, "your full name")?;
                session.step = FlowStep::AwaitingWithdrawWallet;
                session.draft = Draft::Withdraw {
                    full_name: Some(name),
                    wallet: None,
                };
                self.prompt(chat, session, content::ASK_WITHDRAW_WALLET, None)
                    .await
            }
            FlowStep::AwaitingWithdrawWallet => {
                let wallet = Self::require_nonempty(text, "the wallet address")?;
                session.step = FlowStep::AwaitingWithdrawAmount;
                session.draft = Draft::Withdraw {
                    full_name,
                    wallet: Some(wallet),
                };
                self.prompt(chat, session, content::ASK_WITHDRAW_AMOUNT, None)
                    .await
            }
            FlowStep::AwaitingWithdrawAmount => {
                let amount = Self::require_nonempty(text, "the amount")?;
                let (Some(full_name), Some(wallet)) = (full_name, wallet) else {
                    session.reset_flow();
                    return self.show_main_menu(chat, session, None).await;
                };
                self.submit_request(
                    chat,
                    session,
                    RequestKind::Withdraw,
                    full_name,
                    wallet,
                    amount,
                )
                .await
            }
            _ => Ok(()),
        }
    }
}
