//! Admin access for Axum handlers
//!
//! `AdminSession` is an extractor: a handler that names it cannot run unless
//! [`AuthGate::authorize`] succeeded for the request headers.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{request::Parts, StatusCode},
    Json,
};
use tracing::warn;

use crate::application::{AdminSession, AuthError, AuthGate};
use crate::interfaces::http::common::{ApiError, ApiResponse};

impl<S> FromRequestParts<S> for AdminSession
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        gate.authorize(&parts.headers).inspect_err(|e| {
            warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                reason = %e,
                "Rejected admin request"
            );
        })
    }
}

/// Fallback for unknown `/admin/*` paths: 401 without a session, 404 with one.
pub async fn admin_fallback(_session: AdminSession, OriginalUri(uri): OriginalUri) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("No admin route for {}", uri.path()))),
    )
}
