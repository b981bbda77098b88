//! Tariff plan entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication state column
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PublicationState {
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "unpublished")]
    Unpublished,
}

/// Billing period column
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BillingPeriod {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
    #[sea_orm(string_value = "one_time")]
    OneTime,
}

/// Tariff plan model - a service package shown on the site
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariff_plans")]
pub struct Model {
    /// Opaque plan ID (`tp_<hex>`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub description: Option<String>,

    /// Price in minor currency units
    pub price: i64,

    /// ISO 4217 code
    pub currency: String,

    pub billing_period: BillingPeriod,

    /// JSON array of feature strings
    #[sea_orm(column_type = "Text")]
    pub features: String,

    pub publication_state: PublicationState,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
