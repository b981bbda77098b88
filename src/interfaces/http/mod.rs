//! HTTP REST API interfaces
//!
//! - `common`: response envelopes, error mapping, `ValidatedJson`
//! - `middleware`: the `AdminSession` extractor and admin fallback
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
