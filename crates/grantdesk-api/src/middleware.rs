//! Request middleware.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Identifies the client for rate limiting.
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` entry wins over the
/// socket peer; otherwise the header is ignored.
fn client_key(
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    headers: &HeaderMap,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        if let Some(client) = forwarded_for(headers) {
            return client;
        }
    }

    match connect_info {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Rejects requests beyond the configured per-client limit with 429.
pub async fn rate_limit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let config = &state.config;
    if !config.rate_limiting_enabled() {
        return next.run(request).await;
    }

    let key = client_key(
        connect_info.as_ref(),
        request.headers(),
        config.trust_forwarded_for,
    );

    if !state
        .rate_limiter
        .try_acquire(&key, config.rate_limit, config.rate_window)
    {
        debug!(client = %key, "Rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}
