// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP server built on axum.
//!
//! Sets up routes, the auth middleware, and shared state.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use bureau_core::{BureauError, Store};
use bureau_flow::SyncScan;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn Store>,
    pub sync: Arc<SyncScan>,
    pub auth: AuthConfig,
    /// Process start time for the health probe's uptime field.
    pub started_at: Instant,
}

/// Server bind configuration (mirrors `GatewayConfig` from bureau-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Starts the admin HTTP server and serves until the process exits.
///
/// Routes:
/// - GET  /health        (unauthenticated)
/// - POST /admin/sync    (`?key=` secret)
/// - GET  /admin/export  (`?key=` secret)
/// - GET  /admin/stats   (`?key=` secret)
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), BureauError> {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/sync", post(handlers::post_sync))
        .route("/admin/export", get(handlers::get_export))
        .route("/admin/stats", get(handlers::get_stats))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BureauError::Transport {
            message: format!("failed to bind admin gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("admin gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| BureauError::Transport {
            message: format!("admin gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
