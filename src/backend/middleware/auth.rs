/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user. The bearer token from the
 * Authorization header is verified against the configured secret, the user
 * it names is loaded from the store, and the result is attached to the
 * request extensions for handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    /// Blog owner flag
    pub is_author: bool,
}

/// Authentication middleware
///
/// 1. Extracts the token from `Authorization: Bearer <token>`
/// 2. Verifies signature and expiry
/// 3. Loads the user named by the `sub` claim
/// 4. Inserts [`AuthenticatedUser`] into the request extensions
///
/// Any failure is a 401.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("No token provided")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized("Invalid authorization header")
    })?;

    let claims = verify_token(token.trim(), &app_state.config.jwt_secret).map_err(|e| {
        tracing::warn!(error = ?e, "Invalid token");
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!(error = ?e, "Invalid user ID in token");
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user = app_state.store.get_user(user_id).await?.ok_or_else(|| {
        tracing::warn!(%user_id, "Token names an unknown user");
        BackendError::unauthorized("User no longer exists")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        is_author: user.is_author,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}
