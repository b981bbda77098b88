//! Admin access control
//!
//! The gate is an explicit capability check: handlers obtain an
//! [`AdminSession`] from [`AuthGate::authorize`] or they don't run at all.

mod gate;

pub use gate::{AdminCredentials, AdminSession, AuthError, AuthGate, AuthMethod, LoginResult};
