//! Domain layer: entities, value types and repository interfaces

pub mod tariff_plan;

pub use tariff_plan::{
    BillingPeriod, CreateTariffPlanDto, GetTariffPlansDto, PublicationState, SortOrder,
    TariffPlan, TariffPlanRepository, TariffPlanSortField, UpdateTariffPlanDto,
};

pub use crate::shared::errors::{DomainError, DomainResult};
