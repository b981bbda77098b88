use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::application::AuthError;
use crate::domain::DomainError;

/// Error half of every handler's `Result`
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn domain_error_response(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Storage details stay in the logs
    let message = match &err {
        DomainError::Storage(detail) => {
            error!(error = %detail, "Storage failure");
            "Internal storage error".to_string()
        }
        DomainError::Validation(msg) | DomainError::Unauthorized(msg) => msg.clone(),
        other => other.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}

pub fn auth_error_response(err: AuthError) -> ApiError {
    let status = match err {
        AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        auth_error_response(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::tariff_plan_not_found("tp_1"), StatusCode::NOT_FOUND),
            (DomainError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_response(err).0, status);
        }
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let (_, Json(body)) = domain_error_response(DomainError::Storage("secret path".into()));
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Internal storage error"));
    }

    #[test]
    fn auth_errors_are_401() {
        assert_eq!(
            auth_error_response(AuthError::MissingCredentials).0,
            StatusCode::UNAUTHORIZED
        );
    }
}
