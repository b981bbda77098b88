//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{AdminSession, AuthMethod};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub session: SessionInfo,
}

/// Who is behind the current admin session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub subject: String,
    pub role: String,
    /// `jwt` or `api_key`
    pub auth_method: String,
    /// Only set for JWT sessions
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<AdminSession> for SessionInfo {
    fn from(s: AdminSession) -> Self {
        let expires_at = match &s.method {
            AuthMethod::Jwt { expires_at } => Some(*expires_at),
            AuthMethod::ApiKey { .. } => None,
        };
        Self {
            auth_method: s.method.as_str().to_string(),
            subject: s.subject,
            role: s.role,
            expires_at,
        }
    }
}
