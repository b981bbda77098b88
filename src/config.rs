//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/tariff-service/config.toml`)
//! with every section optional. `DATABASE_URL` and `JWT_SECRET` override the
//! file when set.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::{generate_secret, JwtConfig, DEFAULT_ISSUER};
use crate::infrastructure::database::{DatabaseConfig, MEMORY_DATABASE_URL};

pub const CONFIG_DIR_NAME: &str = "tariff-service";
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// `~/.config/tariff-service/config.toml`, or `./config.toml` without a home
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// `sqlite://path?mode=rwc` or `memory`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

impl DatabaseSection {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }

    pub fn connection_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Empty means a random secret per process; tokens die with a restart
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// SHA-256 hex digests of accepted API keys (see `generate-api-key`)
    pub api_key_hashes: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: 24,
            api_key_hashes: Vec::new(),
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("api_key_hashes", &self.api_key_hashes.len())
            .finish()
    }
}

impl SecurityConfig {
    pub fn has_jwt_secret(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn jwt_config(&self) -> JwtConfig {
        let secret = if self.has_jwt_secret() {
            self.jwt_secret.clone()
        } else {
            generate_secret()
        };
        JwtConfig {
            secret,
            expiration_hours: self.jwt_expiration_hours,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// The single back-office account. Login is disabled while `password` is unset.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    /// Plain text or a bcrypt hash
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Read, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.security.has_jwt_secret() && self.security.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            problems.push(format!(
                "security.jwt_secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            ));
        }
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.security.jwt_expiration_hours) {
            problems.push(format!(
                "security.jwt_expiration_hours must be between 1 and {}",
                MAX_JWT_EXPIRATION_HOURS
            ));
        }
        for hash in &self.security.api_key_hashes {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                problems.push(format!(
                    "security.api_key_hashes entry '{}' is not a SHA-256 hex digest",
                    hash
                ));
            }
        }
        if !self.database.is_memory() && !self.database.url.starts_with("sqlite:") {
            problems.push(format!(
                "database.url must be 'memory' or a sqlite: URL, got '{}'",
                self.database.url
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            problems.push("logging.format must be 'pretty' or 'json'".to_string());
        }
        if self.admin.username.trim().is_empty() {
            problems.push("admin.username must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }

    /// Settings that work but should not reach production
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.security.has_jwt_secret() {
            warnings.push(
                "security.jwt_secret is unset: using a random secret, tokens are invalidated on restart"
                    .to_string(),
            );
        }
        if self.admin.password.is_none() && self.security.api_key_hashes.is_empty() {
            warnings.push("no admin password and no API keys: admin API is unreachable".to_string());
        }
        if self.database.is_memory() {
            warnings.push("database.url = \"memory\": plans are lost on restart".to_string());
        }
        warnings
    }
}
