//! Authentication API handlers

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse, SessionInfo};
use crate::application::{AdminSession, AuthGate};
use crate::interfaces::http::common::{auth_error_response, ApiError, ApiResponse, ValidatedJson};

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(gate): State<AuthGate>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = gate
        .login(&request.username, &request.password)
        .await
        .map_err(auth_error_response)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        session: result.session.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = []), ("api_key" = [])),
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_session(session: AdminSession) -> Json<ApiResponse<SessionInfo>> {
    Json(ApiResponse::success(session.into()))
}
