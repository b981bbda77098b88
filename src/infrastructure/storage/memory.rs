//! In-memory storage implementation

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, GetTariffPlansDto, SortOrder, TariffPlan, TariffPlanRepository,
    TariffPlanSortField,
};
use crate::shared::PaginatedResult;

/// In-memory tariff plan storage for development and testing
#[derive(Default)]
pub struct InMemoryTariffPlanRepository {
    plans: DashMap<String, TariffPlan>,
}

impl InMemoryTariffPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(
        mut plans: Vec<TariffPlan>,
        field: TariffPlanSortField,
        order: SortOrder,
    ) -> Vec<TariffPlan> {
        plans.sort_by(|a, b| {
            let ord = field.compare(a, b);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        plans
    }
}

#[async_trait]
impl TariffPlanRepository for InMemoryTariffPlanRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TariffPlan>> {
        Ok(self.plans.get(id).map(|p| p.clone()))
    }

    async fn find_published(&self) -> DomainResult<Vec<TariffPlan>> {
        let published = self
            .plans
            .iter()
            .filter(|e| e.value().is_published())
            .map(|e| e.value().clone())
            .collect();
        Ok(Self::sorted(published, TariffPlanSortField::CreatedAt, SortOrder::Asc))
    }

    async fn list(&self, query: &GetTariffPlansDto) -> DomainResult<PaginatedResult<TariffPlan>> {
        let matching: Vec<TariffPlan> = self
            .plans
            .iter()
            .filter(|e| query.state.map_or(true, |s| e.value().publication_state == s))
            .map(|e| e.value().clone())
            .collect();

        let total = matching.len() as u64;
        let items = Self::sorted(matching, query.sort_by, query.order)
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .collect();

        Ok(PaginatedResult::new(
            items,
            total,
            query.page.page,
            query.page.limit,
        ))
    }

    async fn insert(&self, plan: TariffPlan) -> DomainResult<TariffPlan> {
        match self.plans.entry(plan.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Storage(format!(
                "tariff plan {} already exists",
                plan.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(plan.clone());
                Ok(plan)
            }
        }
    }

    async fn update(&self, plan: TariffPlan) -> DomainResult<TariffPlan> {
        let Some(mut stored) = self.plans.get_mut(&plan.id) else {
            return Err(DomainError::tariff_plan_not_found(plan.id));
        };
        *stored = plan.clone();
        Ok(plan)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.plans
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::tariff_plan_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::{BillingPeriod, PublicationState};
    use crate::shared::PageRequest;

    fn plan(id: &str, name: &str, price: i64, state: PublicationState, age_mins: i64) -> TariffPlan {
        let ts = Utc::now() - Duration::minutes(age_mins);
        TariffPlan {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            currency: "RUB".into(),
            billing_period: BillingPeriod::Monthly,
            features: vec![],
            publication_state: state,
            created_at: ts,
            updated_at: ts,
        }
    }

    async fn seeded() -> InMemoryTariffPlanRepository {
        let repo = InMemoryTariffPlanRepository::new();
        repo.insert(plan("tp_a", "Pro", 5000, PublicationState::Published, 30)).await.unwrap();
        repo.insert(plan("tp_b", "Basic", 1000, PublicationState::Unpublished, 20)).await.unwrap();
        repo.insert(plan("tp_c", "Corp", 9000, PublicationState::Published, 10)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn published_are_filtered_and_ordered_by_creation() {
        let repo = seeded().await;
        let ids: Vec<_> = repo.find_published().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["tp_a", "tp_c"]);
    }

    #[tokio::test]
    async fn list_sorts_and_pages() {
        let repo = seeded().await;
        let query = GetTariffPlansDto {
            sort_by: TariffPlanSortField::Price,
            order: SortOrder::Desc,
            page: PageRequest::new(Some(1), Some(2)),
            ..Default::default()
        };
        let page = repo.list(&query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Corp", "Pro"]);
    }

    #[tokio::test]
    async fn list_filters_by_state() {
        let repo = seeded().await;
        let query = GetTariffPlansDto {
            state: Some(PublicationState::Unpublished),
            ..Default::default()
        };
        let page = repo.list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "tp_b");
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let repo = seeded().await;
        let err = repo
            .insert(plan("tp_a", "Again", 1, PublicationState::Unpublished, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn update_of_missing_plan_is_not_found() {
        let repo = InMemoryTariffPlanRepository::new();
        let err = repo
            .update(plan("tp_x", "Ghost", 1, PublicationState::Unpublished, 0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn second_delete_observes_not_found() {
        let repo = seeded().await;
        repo.delete("tp_a").await.unwrap();
        assert!(repo.delete("tp_a").await.unwrap_err().is_not_found());
        assert!(repo.find_by_id("tp_a").await.unwrap().is_none());
    }
}
