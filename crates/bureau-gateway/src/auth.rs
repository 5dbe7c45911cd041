// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret authentication for the admin surface.
//!
//! The secret travels as a `?key=` query parameter. When no secret is
//! configured, all requests are rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for the admin routes.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected shared secret. `None` rejects everything.
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Extracts the `key` parameter from a raw query string.
fn key_param(query: &str) -> Option<&str> {
    query.split('&').find_map(|pair| pair.strip_prefix("key="))
}

/// Middleware validating the `?key=` secret on every admin request.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.secret.as_deref() else {
        tracing::error!("admin gateway has no secret configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = request.uri().query().and_then(key_param);
    match presented {
        Some(key) if key == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
