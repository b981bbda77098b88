use super::{BillingPeriod, PublicationState, TariffPlan};

/// Partial update: `None` keeps the stored value.
///
/// An empty `description` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateTariffPlanDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub billing_period: Option<BillingPeriod>,
    pub features: Option<Vec<String>>,
    pub publication_state: Option<PublicationState>,
}

impl UpdateTariffPlanDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.billing_period.is_none()
            && self.features.is_none()
            && self.publication_state.is_none()
    }

    /// Merge the provided fields into `plan`. Timestamps are left to the caller.
    pub fn apply_to(self, plan: &mut TariffPlan) {
        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(description) = self.description {
            plan.description = if description.is_empty() {
                None
            } else {
                Some(description)
            };
        }
        if let Some(price) = self.price {
            plan.price = price;
        }
        if let Some(currency) = self.currency {
            plan.currency = currency;
        }
        if let Some(period) = self.billing_period {
            plan.billing_period = period;
        }
        if let Some(features) = self.features {
            plan.features = features;
        }
        if let Some(state) = self.publication_state {
            plan.publication_state = state;
        }
    }
}
