//! Tariff plan repository interface

use async_trait::async_trait;

use super::{GetTariffPlansDto, TariffPlan};
use crate::shared::{DomainResult, PaginatedResult};

/// Persistence collaborator for tariff plans.
///
/// Implementations own the canonical records and their concurrency control:
/// `update` and `delete` must report `NotFound` when the row is gone, so that
/// of two racing deletes only one succeeds.
#[async_trait]
pub trait TariffPlanRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TariffPlan>>;

    /// Published plans ordered by `created_at`, then `id`.
    async fn find_published(&self) -> DomainResult<Vec<TariffPlan>>;

    async fn list(&self, query: &GetTariffPlansDto) -> DomainResult<PaginatedResult<TariffPlan>>;

    async fn insert(&self, plan: TariffPlan) -> DomainResult<TariffPlan>;
    async fn update(&self, plan: TariffPlan) -> DomainResult<TariffPlan>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Liveness check used by the health endpoint.
    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
