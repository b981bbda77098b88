//! API key generation and hashing
//!
//! Keys are never stored: the configuration only lists SHA-256 digests.

use rand::Rng;
use sha2::{Digest, Sha256};

/// API Key prefix for identification
pub const API_KEY_PREFIX: &str = "tpk_";

/// Result of API key generation
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once!)
    pub key: String,
    /// SHA-256 hex digest to put into `security.api_key_hashes`
    pub key_hash: String,
    /// Display prefix, e.g. `tpk_crm-sync_1a2b3c4d...`
    pub prefix: String,
}

/// Slugify a name for embedding in the API key.
/// Converts "CRM Sync" → "crm-sync", max 24 chars.
fn slugify_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.len() > 24 {
        trimmed[..24].trim_end_matches('-').to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generate a new API key: `tpk_<name-slug>_<random-hex>`
pub fn generate_api_key(name: &str) -> GeneratedApiKey {
    let random_bytes: [u8; 16] = rand::thread_rng().gen();
    let random_hex = hex::encode(random_bytes);

    let slug = slugify_name(name);
    let (key, prefix) = if slug.is_empty() {
        (
            format!("{}{}", API_KEY_PREFIX, random_hex),
            format!("{}{}...", API_KEY_PREFIX, &random_hex[..8]),
        )
    } else {
        (
            format!("{}{}_{}", API_KEY_PREFIX, slug, random_hex),
            format!("{}{}_{}...", API_KEY_PREFIX, slug, &random_hex[..8]),
        )
    };

    GeneratedApiKey {
        key_hash: hash_api_key(&key),
        key,
        prefix,
    }
}

/// Hash an API key for storage using SHA-256
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Check if a string looks like an API key
pub fn is_api_key_format(s: &str) -> bool {
    s.starts_with(API_KEY_PREFIX) && s.len() >= API_KEY_PREFIX.len() + 32
}
