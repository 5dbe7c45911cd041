// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, one module per entity table.

pub mod broadcasts;
pub mod dedup;
pub mod rate_limits;
pub mod requests;
pub mod sessions;
pub mod tickets;
pub mod users;
