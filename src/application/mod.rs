//! Application layer: use-case orchestration over domain repositories

pub mod auth;
pub mod tariff_plans;

pub use auth::{AdminCredentials, AdminSession, AuthError, AuthGate, AuthMethod, LoginResult};
pub use tariff_plans::TariffPlanService;
