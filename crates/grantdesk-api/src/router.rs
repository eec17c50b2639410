//! Router configuration and server setup.

use std::net::SocketAddr;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::middleware::rate_limit;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Calls
        .route("/api/calls", get(handlers::list_calls))
        .route("/api/calls/:id", get(handlers::get_call))
        .route("/api/calls/:id/proposals", post(handlers::create_proposal))
        // Admin
        .route("/api/admin/calls", post(handlers::create_call))
        .route(
            "/api/admin/calls/:id/visibility",
            patch(handlers::set_visibility),
        )
        .route("/api/admin/calls/:id/status", patch(handlers::set_status))
        .route("/api/admin/assignments", post(handlers::create_assignment))
        // Proposals
        .route("/api/proposals/:id/submit", post(handlers::submit_proposal))
        .route(
            "/api/proposals/:id/withdraw",
            post(handlers::withdraw_proposal),
        )
        // Me
        .route("/api/me/proposals", get(handlers::my_proposals))
        .route("/api/me/assignments", get(handlers::my_assignments))
        // Reviews
        .route("/api/reviews", post(handlers::submit_review))
        // Apply middleware
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
