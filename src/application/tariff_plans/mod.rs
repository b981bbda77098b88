//! Tariff plan use-cases
//!
//! `TariffPlanService` is the only place that decides what a valid plan is.
//! HTTP handlers translate requests into domain DTOs and delegate here.

pub mod service;

pub use service::TariffPlanService;
