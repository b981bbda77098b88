//! Tariff plan DTOs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::tariff_plan::model::{MAX_FEATURES, MAX_FEATURE_LEN};
use crate::domain::{
    BillingPeriod, CreateTariffPlanDto, GetTariffPlansDto, PublicationState, SortOrder,
    TariffPlan, TariffPlanSortField, UpdateTariffPlanDto,
};
use crate::shared::PageRequest;

/// Тарифный план (полное представление для администратора)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffPlanResponse {
    #[schema(example = "tp_3f2a9c0d41b84e7a9a1d5e6f7c8b9a0d")]
    pub id: String,
    #[schema(example = "Basic")]
    pub name: String,
    pub description: Option<String>,
    /// Price in minor units (kopecks)
    #[schema(example = 1000)]
    pub price: i64,
    #[schema(example = "RUB")]
    pub currency: String,
    #[schema(value_type = String, example = "monthly")]
    pub billing_period: BillingPeriod,
    pub features: Vec<String>,
    #[schema(value_type = String, example = "unpublished")]
    pub publication_state: PublicationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TariffPlan> for TariffPlanResponse {
    fn from(p: TariffPlan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            currency: p.currency,
            billing_period: p.billing_period,
            features: p.features,
            publication_state: p.publication_state,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Тарифный план для публичной витрины (без служебных полей)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicTariffPlanResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
    #[schema(value_type = String, example = "monthly")]
    pub billing_period: BillingPeriod,
    pub features: Vec<String>,
}

impl From<TariffPlan> for PublicTariffPlanResponse {
    fn from(p: TariffPlan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            currency: p.currency,
            billing_period: p.billing_period,
            features: p.features,
        }
    }
}

fn feature_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::from(message));
    err
}

#[allow(clippy::ptr_arg)]
fn validate_features(features: &Vec<String>) -> Result<(), ValidationError> {
    if features.len() > MAX_FEATURES {
        return Err(feature_error(
            "too_many_features",
            format!("at most {} features are allowed", MAX_FEATURES),
        ));
    }
    if features
        .iter()
        .any(|f| f.trim().is_empty() || f.chars().count() > MAX_FEATURE_LEN)
    {
        return Err(feature_error(
            "invalid_feature",
            format!("each feature must be 1-{} characters", MAX_FEATURE_LEN),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTariffPlanRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[schema(example = "Basic")]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must be non-negative"))]
    #[schema(example = 1000)]
    pub price: i64,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    #[schema(example = "RUB")]
    pub currency: Option<String>,
    #[schema(value_type = Option<String>, example = "monthly")]
    pub billing_period: Option<BillingPeriod>,
    #[serde(default)]
    #[validate(custom(function = "validate_features"))]
    pub features: Vec<String>,
    #[schema(value_type = Option<String>, example = "unpublished")]
    pub publication_state: Option<PublicationState>,
}

impl From<CreateTariffPlanRequest> for CreateTariffPlanDto {
    fn from(r: CreateTariffPlanRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            currency: r.currency,
            billing_period: r.billing_period,
            features: r.features,
            publication_state: r.publication_state,
        }
    }
}

/// Partial update; omitted fields keep their values, `""` clears the description
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTariffPlanRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: Option<i64>,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[schema(value_type = Option<String>)]
    pub billing_period: Option<BillingPeriod>,
    #[validate(custom(function = "validate_features"))]
    pub features: Option<Vec<String>>,
    #[schema(value_type = Option<String>, example = "published")]
    pub publication_state: Option<PublicationState>,
}

impl From<UpdateTariffPlanRequest> for UpdateTariffPlanDto {
    fn from(r: UpdateTariffPlanRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            currency: r.currency,
            billing_period: r.billing_period,
            features: r.features,
            publication_state: r.publication_state,
        }
    }
}

/// Admin list query: `?sort=price&order=desc&page=2&limit=10&state=published`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTariffPlansParams {
    /// name | price | created_at | updated_at | publication_state
    #[param(value_type = Option<String>)]
    pub sort: Option<TariffPlanSortField>,
    /// asc | desc
    #[param(value_type = Option<String>)]
    pub order: Option<SortOrder>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size, 1-100 (default 25)
    pub limit: Option<u32>,
    /// published | unpublished
    #[param(value_type = Option<String>)]
    pub state: Option<PublicationState>,
}

impl From<ListTariffPlansParams> for GetTariffPlansDto {
    fn from(p: ListTariffPlansParams) -> Self {
        Self {
            state: p.state,
            sort_by: p.sort.unwrap_or_default(),
            order: p.order.unwrap_or_default(),
            page: PageRequest::new(p.page, p.limit),
        }
    }
}
