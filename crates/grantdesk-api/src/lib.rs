//! REST API for Grantdesk.
//!
//! This crate exposes the grant lifecycle over HTTP:
//! - Calls (public listing, visibility-resolved detail, admin creation)
//! - Proposals (drafting, submission, withdrawal)
//! - Review assignments and review submission
//! - Result release (admin visibility toggle)
//!
//! # Example
//!
//! ```ignore
//! use grantdesk_api::{ApiConfig, AppState, serve};
//! use grantdesk_core::TokenFileAuthenticator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = TokenFileAuthenticator::load("tokens.json".as_ref())?;
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.clone(), "/var/lib/grantdesk", Arc::new(auth));
//!
//!     serve(config, state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
