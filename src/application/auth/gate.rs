use std::collections::HashSet;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::crypto::api_key::{hash_api_key, is_api_key_format};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, is_bcrypt_hash, verify_password};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Failed to issue token: {0}")]
    TokenIssue(String),
}

/// How the session was established
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Jwt { expires_at: DateTime<Utc> },
    /// Only the first characters of the key are kept, for logs
    ApiKey { key_prefix: String },
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jwt { .. } => "jwt",
            Self::ApiKey { .. } => "api_key",
        }
    }
}

/// Proof that the current request passed the admin gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub subject: String,
    pub role: String,
    pub method: AuthMethod,
}

/// Configured administrator account. The password is only kept as a bcrypt hash.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    /// Accepts either a plain password (hashed here) or an existing bcrypt hash.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, bcrypt::BcryptError> {
        let password_hash = if is_bcrypt_hash(password) {
            password.to_string()
        } else {
            hash_password(password)?
        };
        Ok(Self::with_hash(username, password_hash))
    }

    pub fn with_hash(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Token handed out by a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub session: AdminSession,
}

#[derive(Clone)]
pub struct AuthGate {
    jwt_config: JwtConfig,
    api_key_hashes: Arc<HashSet<String>>,
    admin: Option<Arc<AdminCredentials>>,
}

impl AuthGate {
    pub fn new(
        jwt_config: JwtConfig,
        api_key_hashes: impl IntoIterator<Item = String>,
        admin: Option<AdminCredentials>,
    ) -> Self {
        let api_key_hashes = api_key_hashes
            .into_iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self {
            jwt_config,
            api_key_hashes: Arc::new(api_key_hashes),
            admin: admin.map(Arc::new),
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    /// Decide whether the request headers carry a valid admin credential.
    ///
    /// `X-API-Key` wins over `Authorization`. The latter may hold either
    /// `Bearer <jwt>`, `Bearer <api key>` or a bare API key.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AdminSession, AuthError> {
        if let Some(key) = header_str(headers, API_KEY_HEADER) {
            return self.authorize_api_key(key);
        }

        let Some(value) = header_str(headers, header::AUTHORIZATION.as_str()) else {
            return Err(AuthError::MissingCredentials);
        };

        let (credential, is_bearer) = match value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
        {
            Some(token) => (token.trim(), true),
            None => (value, false),
        };

        if is_api_key_format(credential) {
            self.authorize_api_key(credential)
        } else if is_bearer {
            self.authorize_jwt(credential)
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    fn authorize_jwt(&self, token: &str) -> Result<AdminSession, AuthError> {
        let claims = verify_token(token, &self.jwt_config).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;
        if claims.role != ADMIN_ROLE {
            debug!(subject = %claims.sub, role = %claims.role, "Token without admin role");
            return Err(AuthError::InvalidToken);
        }

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;
        Ok(AdminSession {
            subject: claims.sub,
            role: claims.role,
            method: AuthMethod::Jwt { expires_at },
        })
    }

    fn authorize_api_key(&self, key: &str) -> Result<AdminSession, AuthError> {
        let key = key.trim();
        if !is_api_key_format(key) || !self.api_key_hashes.contains(&hash_api_key(key)) {
            return Err(AuthError::InvalidApiKey);
        }

        let key_prefix: String = key.chars().take(12).collect();
        Ok(AdminSession {
            subject: format!("api-key:{}", key_prefix),
            role: ADMIN_ROLE.to_string(),
            method: AuthMethod::ApiKey { key_prefix },
        })
    }

    /// Exchange the configured admin credentials for a signed token.
    ///
    /// bcrypt is CPU-bound, so verification runs on the blocking pool.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some(admin) = self.admin.clone() else {
            warn!("Login attempted but no admin account is configured");
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = admin.password_hash.clone();
        let password_ok = tokio::task::spawn_blocking(move || {
            verify_password(&password, &hash).unwrap_or(false)
        })
        .await
        .unwrap_or(false);

        if username != admin.username || !password_ok {
            warn!(username = %username, "Failed admin login");
            return Err(AuthError::InvalidCredentials);
        }

        let expires_in = self
            .jwt_config
            .expiration_hours
            .checked_mul(3600)
            .ok_or_else(|| {
                AuthError::TokenIssue(format!(
                    "token lifetime of {} hours is out of range",
                    self.jwt_config.expiration_hours
                ))
            })?;
        let token = create_token(&admin.username, ADMIN_ROLE, &self.jwt_config)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        let session = self.authorize_jwt(&token)?;
        info!(username = %admin.username, "Admin logged in");

        Ok(LoginResult {
            token,
            token_type: "Bearer".into(),
            expires_in,
            session,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::infrastructure::crypto::api_key::generate_api_key;
    use crate::infrastructure::crypto::password::hash_password_with_cost;

    fn gate_with_key() -> (AuthGate, String) {
        let key = generate_api_key("crm");
        let admin = AdminCredentials::with_hash(
            "admin",
            hash_password_with_cost("s3cret", 4).unwrap(),
        );
        let gate = AuthGate::new(JwtConfig::default(), vec![key.key_hash], Some(admin));
        (gate, key.key)
    }

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn no_headers_is_missing_credentials() {
        let (gate, _) = gate_with_key();
        assert_eq!(
            gate.authorize(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn valid_bearer_token_opens_session() {
        let (gate, _) = gate_with_key();
        let token = create_token("admin", ADMIN_ROLE, gate.jwt_config()).unwrap();

        let session = gate
            .authorize(&headers("authorization", &format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(session.subject, "admin");
        assert_eq!(session.method.as_str(), "jwt");
    }

    #[test]
    fn bad_and_expired_tokens_are_rejected() {
        let (gate, _) = gate_with_key();
        assert_eq!(
            gate.authorize(&headers("authorization", "Bearer not-a-jwt")),
            Err(AuthError::InvalidToken)
        );

        let expired_cfg = JwtConfig {
            expiration_hours: -2,
            ..gate.jwt_config().clone()
        };
        let expired = create_token("admin", ADMIN_ROLE, &expired_cfg).unwrap();
        assert_eq!(
            gate.authorize(&headers("authorization", &format!("Bearer {}", expired))),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn non_admin_role_is_rejected() {
        let (gate, _) = gate_with_key();
        let token = create_token("viewer", "viewer", gate.jwt_config()).unwrap();
        assert_eq!(
            gate.authorize(&headers("authorization", &format!("Bearer {}", token))),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn basic_auth_scheme_is_rejected() {
        let (gate, _) = gate_with_key();
        assert_eq!(
            gate.authorize(&headers("authorization", "Basic YWRtaW46YWRtaW4=")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn api_key_is_accepted_in_either_header() {
        let (gate, key) = gate_with_key();

        let via_header = gate.authorize(&headers("x-api-key", &key)).unwrap();
        assert_eq!(via_header.method.as_str(), "api_key");

        assert!(gate.authorize(&headers("authorization", &key)).is_ok());
        assert!(gate
            .authorize(&headers("authorization", &format!("Bearer {}", key)))
            .is_ok());
    }

    #[test]
    fn unknown_api_key_is_rejected() {
        let (gate, _) = gate_with_key();
        let other = generate_api_key("other").key;
        assert_eq!(
            gate.authorize(&headers("x-api-key", &other)),
            Err(AuthError::InvalidApiKey)
        );
    }

    #[tokio::test]
    async fn login_issues_token_accepted_by_authorize() {
        let (gate, _) = gate_with_key();
        let result = gate.login("admin", "s3cret").await.unwrap();
        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.expires_in, 24 * 3600);

        let session = gate
            .authorize(&headers("authorization", &format!("Bearer {}", result.token)))
            .unwrap();
        assert_eq!(session.subject, "admin");
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let (gate, _) = gate_with_key();
        assert_eq!(
            gate.login("admin", "nope").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            gate.login("root", "s3cret").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn login_with_oversized_lifetime_fails_without_panicking() {
        let admin = AdminCredentials::with_hash(
            "admin",
            hash_password_with_cost("s3cret", 4).unwrap(),
        );
        let config = JwtConfig {
            expiration_hours: i64::MAX / 2,
            ..JwtConfig::default()
        };
        let gate = AuthGate::new(config, Vec::new(), Some(admin));
        assert!(matches!(
            gate.login("admin", "s3cret").await,
            Err(AuthError::TokenIssue(_))
        ));
    }

    #[tokio::test]
    async fn login_without_configured_admin_fails() {
        let gate = AuthGate::new(JwtConfig::default(), Vec::new(), None);
        assert!(gate.login("admin", "admin").await.is_err());
    }

    #[test]
    fn credentials_keep_existing_hash() {
        let hash = hash_password_with_cost("pw", 4).unwrap();
        let creds = AdminCredentials::new("admin", &hash).unwrap();
        assert_eq!(creds.password_hash, hash);
        assert!(!format!("{:?}", creds).contains(&hash));
    }
}
