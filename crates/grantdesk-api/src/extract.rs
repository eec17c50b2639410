//! Request extractors for identity and JSON bodies.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;

use grantdesk_models::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the bearer token from an `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent and an error when it is
/// present but not a bearer token.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::AuthenticationRequired("malformed authorization header".into()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::AuthenticationRequired("expected a bearer token".into()))?;

    Ok(Some(token))
}

/// An authenticated requester. Rejects with 401 when no valid token is sent.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(parts)?
            .ok_or_else(|| ApiError::AuthenticationRequired("missing bearer token".into()))?;
        let identity = state.authenticator.authenticate(token).await?;
        Ok(Authenticated(identity))
    }
}

/// An optional requester for endpoints anonymous viewers may call.
///
/// A missing header yields `None`; a present but invalid token is still 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        match bearer_token(parts)? {
            Some(token) => {
                let identity = state.authenticator.authenticate(token).await?;
                Ok(MaybeAuthenticated(Some(identity)))
            }
            None => Ok(MaybeAuthenticated(None)),
        }
    }
}

/// JSON body extractor whose rejections use the API error format.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    ApiError::ValidationFailed(rejection.body_text())
}

/// Fails with 403 unless the identity holds an administrative role.
pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.roles.is_admin() {
        Ok(())
    } else {
        Err(ApiError::InsufficientPermissions(
            "administrator role required".to_string(),
        ))
    }
}
