//! Tariff plan service: application-layer orchestration

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{
    CreateTariffPlanDto, DomainError, DomainResult, GetTariffPlansDto, PublicationState,
    TariffPlan, TariffPlanRepository, UpdateTariffPlanDto,
};
use crate::domain::tariff_plan::model::DEFAULT_CURRENCY;
use crate::shared::PaginatedResult;

/// Orchestrates every tariff-plan use-case over a repository.
///
/// Holds no plan data itself: each call reads or writes through the
/// repository exactly once per step.
#[derive(Clone)]
pub struct TariffPlanService {
    repo: Arc<dyn TariffPlanRepository>,
}

impl TariffPlanService {
    pub fn new(repo: Arc<dyn TariffPlanRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn TariffPlanRepository> {
        &self.repo
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Plans visible to anonymous visitors, oldest first.
    pub async fn get_published_tariff_plans(&self) -> DomainResult<Vec<TariffPlan>> {
        let plans = self.repo.find_published().await?;
        debug!(count = plans.len(), "Loaded published tariff plans");
        Ok(plans)
    }

    /// Every plan regardless of state, sorted and paged.
    pub async fn get_all_tariff_plans(
        &self,
        query: GetTariffPlansDto,
    ) -> DomainResult<PaginatedResult<TariffPlan>> {
        self.repo.list(&query).await
    }

    pub async fn get_tariff_plan(&self, id: &str) -> DomainResult<TariffPlan> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::tariff_plan_not_found(id))
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create_tariff_plan(&self, dto: CreateTariffPlanDto) -> DomainResult<TariffPlan> {
        let now = Utc::now();
        let plan = TariffPlan {
            id: TariffPlan::generate_id(),
            name: dto.name.trim().to_string(),
            description: dto.description.filter(|d| !d.is_empty()),
            price: dto.price,
            currency: dto
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            billing_period: dto.billing_period.unwrap_or_default(),
            features: dto.features,
            publication_state: dto.publication_state.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        plan.validate()?;

        let saved = self.repo.insert(plan).await?;
        info!(
            plan_id = %saved.id,
            name = %saved.name,
            state = %saved.publication_state,
            "Tariff plan created"
        );
        Ok(saved)
    }

    /// Merge `patch` into the stored plan and persist it.
    ///
    /// The merged record is validated as a whole, so a patch can't leave
    /// a plan in a state `create_tariff_plan` would have rejected.
    pub async fn update_tariff_plan(
        &self,
        id: &str,
        patch: UpdateTariffPlanDto,
    ) -> DomainResult<TariffPlan> {
        let mut plan = self.get_tariff_plan(id).await?;
        if patch.is_empty() {
            return Ok(plan);
        }

        patch.apply_to(&mut plan);
        plan.name = plan.name.trim().to_string();
        plan.validate()?;
        plan.updated_at = Utc::now();

        let saved = self.repo.update(plan).await?;
        info!(plan_id = %saved.id, state = %saved.publication_state, "Tariff plan updated");
        Ok(saved)
    }

    pub async fn delete_tariff_plan(&self, id: &str) -> DomainResult<()> {
        self.repo.delete(id).await?;
        info!(plan_id = %id, "Tariff plan deleted");
        Ok(())
    }

    /// Publish or unpublish a plan. Setting the current state again is a no-op.
    pub async fn set_publication_state(
        &self,
        id: &str,
        state: PublicationState,
    ) -> DomainResult<TariffPlan> {
        let mut plan = self.get_tariff_plan(id).await?;
        if plan.publication_state == state {
            return Ok(plan);
        }

        plan.publication_state = state;
        plan.updated_at = Utc::now();
        let saved = self.repo.update(plan).await?;
        info!(plan_id = %saved.id, state = %state, "Tariff plan publication state changed");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingPeriod, SortOrder, TariffPlanSortField};
    use crate::infrastructure::storage::InMemoryTariffPlanRepository;
    use crate::shared::PageRequest;

    fn service() -> TariffPlanService {
        TariffPlanService::new(Arc::new(InMemoryTariffPlanRepository::new()))
    }

    fn basic() -> CreateTariffPlanDto {
        CreateTariffPlanDto {
            name: "Basic".into(),
            price: 1000,
            publication_state: Some(PublicationState::Unpublished),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_input_plus_id() {
        let svc = service();
        let created = svc
            .create_tariff_plan(CreateTariffPlanDto {
                description: Some("Starter bundle".into()),
                features: vec!["Remote support".into()],
                billing_period: Some(BillingPeriod::Yearly),
                ..basic()
            })
            .await
            .unwrap();

        assert!(created.id.starts_with("tp_"));
        let fetched = svc.get_tariff_plan(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Basic");
        assert_eq!(fetched.price, 1000);
        assert_eq!(fetched.currency, "RUB");
        assert_eq!(fetched.billing_period, BillingPeriod::Yearly);
        assert_eq!(fetched.features, vec!["Remote support".to_string()]);
        assert_eq!(fetched.publication_state, PublicationState::Unpublished);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn create_defaults_to_unpublished() {
        let svc = service();
        let created = svc
            .create_tariff_plan(CreateTariffPlanDto {
                publication_state: None,
                ..basic()
            })
            .await
            .unwrap();
        assert_eq!(created.publication_state, PublicationState::Unpublished);
        assert_eq!(created.billing_period, BillingPeriod::Monthly);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_persisting() {
        let svc = service();
        let err = svc
            .create_tariff_plan(CreateTariffPlanDto {
                name: "  ".into(),
                price: -1,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let all = svc
            .get_all_tariff_plans(GetTariffPlansDto::default())
            .await
            .unwrap();
        assert_eq!(all.total, 0);
    }

    #[tokio::test]
    async fn create_trims_name() {
        let created = service()
            .create_tariff_plan(CreateTariffPlanDto {
                name: "  Pro  ".into(),
                ..basic()
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Pro");
    }

    #[tokio::test]
    async fn published_list_contains_exactly_published_plans() {
        let svc = service();
        let draft = svc.create_tariff_plan(basic()).await.unwrap();
        let live = svc
            .create_tariff_plan(CreateTariffPlanDto {
                name: "Pro".into(),
                publication_state: Some(PublicationState::Published),
                ..basic()
            })
            .await
            .unwrap();

        let ids: Vec<_> = svc
            .get_published_tariff_plans()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![live.id]);
        assert!(!ids.contains(&draft.id));
    }

    #[tokio::test]
    async fn update_to_published_makes_plan_public() {
        let svc = service();
        let plan = svc.create_tariff_plan(basic()).await.unwrap();
        assert!(svc.get_published_tariff_plans().await.unwrap().is_empty());

        let updated = svc
            .update_tariff_plan(
                &plan.id,
                UpdateTariffPlanDto {
                    publication_state: Some(PublicationState::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_published());
        assert_eq!(updated.created_at, plan.created_at);
        assert!(updated.updated_at >= plan.updated_at);

        let public = svc.get_published_tariff_plans().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, plan.id);
    }

    #[tokio::test]
    async fn update_revalidates_merged_plan() {
        let svc = service();
        let plan = svc.create_tariff_plan(basic()).await.unwrap();

        let err = svc
            .update_tariff_plan(
                &plan.id,
                UpdateTariffPlanDto {
                    price: Some(-10),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(svc.get_tariff_plan(&plan.id).await.unwrap().price, 1000);
    }

    #[tokio::test]
    async fn update_unknown_plan_is_not_found() {
        let err = service()
            .update_tariff_plan(
                "tp_missing",
                UpdateTariffPlanDto {
                    name: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let plan = svc.create_tariff_plan(basic()).await.unwrap();

        svc.delete_tariff_plan(&plan.id).await.unwrap();
        assert!(svc.get_tariff_plan(&plan.id).await.unwrap_err().is_not_found());
        assert!(svc.delete_tariff_plan(&plan.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn concurrent_deletes_only_one_succeeds() {
        let svc = service();
        let plan = svc.create_tariff_plan(basic()).await.unwrap();

        let (a, b) = tokio::join!(
            svc.delete_tariff_plan(&plan.id),
            svc.delete_tariff_plan(&plan.id)
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    }

    #[tokio::test]
    async fn publication_state_toggles_both_ways() {
        let svc = service();
        let plan = svc.create_tariff_plan(basic()).await.unwrap();

        let published = svc
            .set_publication_state(&plan.id, PublicationState::Published)
            .await
            .unwrap();
        assert!(published.is_published());

        let again = svc
            .set_publication_state(&plan.id, PublicationState::Published)
            .await
            .unwrap();
        assert_eq!(again.updated_at, published.updated_at);

        let hidden = svc
            .set_publication_state(&plan.id, PublicationState::Unpublished)
            .await
            .unwrap();
        assert!(!hidden.is_published());
        assert!(svc.get_published_tariff_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_list_includes_every_state_sorted() {
        let svc = service();
        for (name, price, state) in [
            ("Gold", 3000, PublicationState::Published),
            ("Bronze", 1000, PublicationState::Unpublished),
            ("Silver", 2000, PublicationState::Published),
        ] {
            svc.create_tariff_plan(CreateTariffPlanDto {
                name: name.into(),
                price,
                publication_state: Some(state),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let page = svc
            .get_all_tariff_plans(GetTariffPlansDto {
                sort_by: TariffPlanSortField::Price,
                order: SortOrder::Desc,
                page: PageRequest::new(Some(1), Some(10)),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Gold", "Silver", "Bronze"]);
        assert_eq!(page.total, 3);

        let drafts = svc
            .get_all_tariff_plans(GetTariffPlansDto {
                state: Some(PublicationState::Unpublished),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(drafts.total, 1);
        assert_eq!(drafts.items[0].name, "Bronze");
    }
}
