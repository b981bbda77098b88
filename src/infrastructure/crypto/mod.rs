//! Token, password and API-key primitives

pub mod api_key;
pub mod jwt;
pub mod password;
