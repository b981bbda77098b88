use super::{BillingPeriod, PublicationState};

/// Input for creating a plan; unset fields take their defaults
#[derive(Debug, Clone, Default)]
pub struct CreateTariffPlanDto {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: Option<String>,
    pub billing_period: Option<BillingPeriod>,
    pub features: Vec<String>,
    pub publication_state: Option<PublicationState>,
}
