//! # Tariff Plan Administration Service
//!
//! Public catalogue of published tariff plans plus an authenticated
//! back-office API to create, edit, publish and delete them.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **shared**: Errors, pagination, shutdown coordination
//! - **domain**: `TariffPlan` entity, DTOs and the repository trait
//! - **application**: `TariffPlanService` use-cases and the `AuthGate` capability check
//! - **infrastructure**: SeaORM/SQLite and in-memory repositories, crypto helpers
//! - **interfaces**: REST API with Swagger documentation
//! - **config** / **server**: TOML configuration and process lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{AuthGate, TariffPlanService};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::{create_api_router, AppState};
