//! Tariff plan aggregate
//!
//! Contains the TariffPlan entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_get;
mod dto_update;

pub use model::{BillingPeriod, PublicationState, SortOrder, TariffPlan, TariffPlanSortField};

pub use dto_create::CreateTariffPlanDto;
pub use dto_get::GetTariffPlansDto;
pub use dto_update::UpdateTariffPlanDto;

pub use repository::TariffPlanRepository;
