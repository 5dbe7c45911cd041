// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the admin surface.

use axum::{extract::State, http::StatusCode, Json};
use bureau_core::types::{BroadcastEntry, Request, Ticket, User};
use bureau_core::BureauError;
use serde::Serialize;
use serde_json::{json, Value};

use crate::server::GatewayState;

fn internal(err: BureauError) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %err, "admin handler failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

/// GET /health -- unauthenticated liveness probe.
pub async fn get_health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

/// POST /admin/sync -- runs one sync scan and reports what it delivered.
pub async fn post_sync(
    State(state): State<GatewayState>,
) -> Result<Json<bureau_flow::SyncReport>, (StatusCode, Json<Value>)> {
    let report = state.sync.run().await.map_err(internal)?;
    Ok(Json(report))
}

/// GET /admin/stats -- aggregate counts over the row store.
pub async fn get_stats(
    State(state): State<GatewayState>,
) -> Result<Json<bureau_core::types::StatsSnapshot>, (StatusCode, Json<Value>)> {
    let snapshot = bureau_flow::stats::collect(&state.store)
        .await
        .map_err(internal)?;
    Ok(Json(snapshot))
}

/// Everything the bot persists, in one JSON document.
#[derive(Debug, Serialize)]
pub struct ExportPayload {
    pub users: Vec<User>,
    pub tickets: Vec<Ticket>,
    pub requests: Vec<Request>,
    pub broadcasts: Vec<BroadcastEntry>,
}

/// GET /admin/export -- full dump of users, tickets, requests, and the
/// broadcast ledger.
pub async fn get_export(
    State(state): State<GatewayState>,
) -> Result<Json<ExportPayload>, (StatusCode, Json<Value>)> {
    let users = state.store.list_users().await.map_err(internal)?;
    let tickets = state.store.list_tickets().await.map_err(internal)?;
    let requests = state.store.list_requests().await.map_err(internal)?;
    let broadcasts = state.store.list_broadcasts().await.map_err(internal)?;
    Ok(Json(ExportPayload {
        users,
        tickets,
        requests,
        broadcasts,
    }))
}
