// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Step handlers for each guided flow, implemented as `impl FlowEngine`
//! blocks so they share the engine's store, transport, and menu helpers.

mod admin;
mod invest;
mod registration;
mod ticket;
mod withdraw;
