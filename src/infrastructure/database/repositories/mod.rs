//! Database repository implementations

pub mod tariff_plan_repository;

pub use tariff_plan_repository::SeaOrmTariffPlanRepository;
