//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ISSUER: &str = "tariff-service";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime of {0} hours is out of range")]
    LifetimeOutOfRange(i64),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Random 256-bit signing secret, hex encoded
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Signs with a fresh random secret, so tokens never outlive the value.
impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: generate_secret(),
            expiration_hours: 24,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (admin username)
    pub sub: String,
    /// Role granted to the session
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(subject: &str, role: &str, config: &JwtConfig) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = Duration::try_hours(config.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::LifetimeOutOfRange(config.expiration_hours))?;

        Ok(Self {
            sub: subject.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        })
    }
}

/// Create a signed token for `subject`
pub fn create_token(
    subject: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let claims = TokenClaims::new(subject, role, config)?;

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Verify and decode a JWT token (signature, issuer and `exp`)
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
