// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the flow engine and its external collaborators.

pub mod storage;
pub mod transport;

pub use storage::Store;
pub use transport::ChatTransport;
