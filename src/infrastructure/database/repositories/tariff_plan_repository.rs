//! SeaORM implementation of TariffPlanRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use tracing::{debug, info};

use crate::domain::{
    BillingPeriod, DomainError, DomainResult, GetTariffPlansDto, PublicationState, SortOrder,
    TariffPlan, TariffPlanRepository, TariffPlanSortField,
};
use crate::infrastructure::database::entities::tariff_plan;
use crate::shared::PaginatedResult;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: tariff_plan::Model) -> DomainResult<TariffPlan> {
    let features: Vec<String> = serde_json::from_str(&m.features)?;
    Ok(TariffPlan {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
        currency: m.currency,
        billing_period: match m.billing_period {
            tariff_plan::BillingPeriod::Monthly => BillingPeriod::Monthly,
            tariff_plan::BillingPeriod::Quarterly => BillingPeriod::Quarterly,
            tariff_plan::BillingPeriod::Yearly => BillingPeriod::Yearly,
            tariff_plan::BillingPeriod::OneTime => BillingPeriod::OneTime,
        },
        features,
        publication_state: match m.publication_state {
            tariff_plan::PublicationState::Published => PublicationState::Published,
            tariff_plan::PublicationState::Unpublished => PublicationState::Unpublished,
        },
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn period_to_entity(p: BillingPeriod) -> tariff_plan::BillingPeriod {
    match p {
        BillingPeriod::Monthly => tariff_plan::BillingPeriod::Monthly,
        BillingPeriod::Quarterly => tariff_plan::BillingPeriod::Quarterly,
        BillingPeriod::Yearly => tariff_plan::BillingPeriod::Yearly,
        BillingPeriod::OneTime => tariff_plan::BillingPeriod::OneTime,
    }
}

fn state_to_entity(s: PublicationState) -> tariff_plan::PublicationState {
    match s {
        PublicationState::Published => tariff_plan::PublicationState::Published,
        PublicationState::Unpublished => tariff_plan::PublicationState::Unpublished,
    }
}

fn sort_column(field: TariffPlanSortField) -> tariff_plan::Column {
    match field {
        TariffPlanSortField::Name => tariff_plan::Column::Name,
        TariffPlanSortField::Price => tariff_plan::Column::Price,
        TariffPlanSortField::CreatedAt => tariff_plan::Column::CreatedAt,
        TariffPlanSortField::UpdatedAt => tariff_plan::Column::UpdatedAt,
        TariffPlanSortField::PublicationState => tariff_plan::Column::PublicationState,
    }
}

fn to_active_model(p: TariffPlan) -> DomainResult<tariff_plan::ActiveModel> {
    Ok(tariff_plan::ActiveModel {
        id: Set(p.id),
        name: Set(p.name),
        description: Set(p.description),
        price: Set(p.price),
        currency: Set(p.currency),
        billing_period: Set(period_to_entity(p.billing_period)),
        features: Set(serde_json::to_string(&p.features)?),
        publication_state: Set(state_to_entity(p.publication_state)),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    })
}

// ── SeaOrmTariffPlanRepository ──────────────────────────────────

pub struct SeaOrmTariffPlanRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffPlanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TariffPlanRepository for SeaOrmTariffPlanRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TariffPlan>> {
        tariff_plan::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(entity_to_domain)
            .transpose()
    }

    async fn find_published(&self) -> DomainResult<Vec<TariffPlan>> {
        let models = tariff_plan::Entity::find()
            .filter(tariff_plan::Column::PublicationState.eq(tariff_plan::PublicationState::Published))
            .order_by_asc(tariff_plan::Column::CreatedAt)
            .order_by_asc(tariff_plan::Column::Id)
            .all(&self.db)
            .await?;
        models.into_iter().map(entity_to_domain).collect()
    }

    async fn list(&self, query: &GetTariffPlansDto) -> DomainResult<PaginatedResult<TariffPlan>> {
        let mut select = tariff_plan::Entity::find();
        if let Some(state) = query.state {
            select = select.filter(tariff_plan::Column::PublicationState.eq(state_to_entity(state)));
        }

        let total = select.clone().count(&self.db).await?;

        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let models = select
            .order_by(sort_column(query.sort_by), order.clone())
            .order_by(tariff_plan::Column::Id, order)
            .offset(query.page.offset())
            .limit(query.page.limit as u64)
            .all(&self.db)
            .await?;

        let items = models
            .into_iter()
            .map(entity_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        debug!(total, returned = items.len(), "Listed tariff plans");

        Ok(PaginatedResult::new(
            items,
            total,
            query.page.page,
            query.page.limit,
        ))
    }

    async fn insert(&self, plan: TariffPlan) -> DomainResult<TariffPlan> {
        let saved = to_active_model(plan)?.insert(&self.db).await?;
        info!(plan_id = %saved.id, name = %saved.name, "Tariff plan saved");
        entity_to_domain(saved)
    }

    async fn update(&self, plan: TariffPlan) -> DomainResult<TariffPlan> {
        let id = plan.id.clone();
        let mut model = to_active_model(plan)?;
        model.created_at = NotSet;

        match model.update(&self.db).await {
            Ok(updated) => entity_to_domain(updated),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::tariff_plan_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = tariff_plan::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::tariff_plan_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::shared::PageRequest;

    async fn repo() -> SeaOrmTariffPlanRepository {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmTariffPlanRepository::new(db)
    }

    fn plan(id: &str, name: &str, price: i64, state: PublicationState, age_mins: i64) -> TariffPlan {
        let ts = Utc::now() - Duration::minutes(age_mins);
        TariffPlan {
            id: id.into(),
            name: name.into(),
            description: Some(format!("{} plan", name)),
            price,
            currency: "RUB".into(),
            billing_period: BillingPeriod::Yearly,
            features: vec!["Updates".into(), "Hotline".into()],
            publication_state: state,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[tokio::test]
    async fn insert_then_find_returns_same_fields() {
        let repo = repo().await;
        let original = plan("tp_1", "Basic", 1000, PublicationState::Unpublished, 0);
        repo.insert(original.clone()).await.unwrap();

        let found = repo.find_by_id("tp_1").await.unwrap().unwrap();
        assert_eq!(found.name, original.name);
        assert_eq!(found.price, 1000);
        assert_eq!(found.features, original.features);
        assert_eq!(found.billing_period, BillingPeriod::Yearly);
        assert_eq!(found.publication_state, PublicationState::Unpublished);
        assert!(repo.find_by_id("tp_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_published_filters_and_orders() {
        let repo = repo().await;
        repo.insert(plan("tp_b", "Later", 1, PublicationState::Published, 5)).await.unwrap();
        repo.insert(plan("tp_a", "Earlier", 1, PublicationState::Published, 50)).await.unwrap();
        repo.insert(plan("tp_c", "Draft", 1, PublicationState::Unpublished, 60)).await.unwrap();

        let ids: Vec<_> = repo
            .find_published()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["tp_a", "tp_b"]);
    }

    #[tokio::test]
    async fn list_sorts_pages_and_counts() {
        let repo = repo().await;
        for (i, price) in [300, 100, 200].into_iter().enumerate() {
            repo.insert(plan(&format!("tp_{}", i), "P", price, PublicationState::Unpublished, 0))
                .await
                .unwrap();
        }

        let page = repo
            .list(&GetTariffPlansDto {
                sort_by: TariffPlanSortField::Price,
                order: SortOrder::Asc,
                page: PageRequest::new(Some(2), Some(2)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].price, 300);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_reports_missing() {
        let repo = repo().await;
        let original = repo
            .insert(plan("tp_1", "Basic", 1000, PublicationState::Unpublished, 60))
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.publication_state = PublicationState::Published;
        changed.created_at = Utc::now();
        changed.updated_at = Utc::now();
        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.publication_state, PublicationState::Published);
        assert_eq!(
            updated.created_at.timestamp_millis(),
            original.created_at.timestamp_millis()
        );

        let ghost = plan("tp_ghost", "Ghost", 1, PublicationState::Unpublished, 0);
        assert!(repo.update(ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_twice_second_is_not_found() {
        let repo = repo().await;
        repo.insert(plan("tp_1", "Basic", 1000, PublicationState::Published, 0))
            .await
            .unwrap();
        repo.delete("tp_1").await.unwrap();
        assert!(repo.delete("tp_1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_connection() {
        repo().await.ping().await.unwrap();
    }
}
