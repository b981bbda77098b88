//! Tariff plan domain entity

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::errors::{DomainError, DomainResult};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_FEATURES: usize = 50;
pub const MAX_FEATURE_LEN: usize = 200;
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Public visibility of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationState {
    Published,
    #[default]
    Unpublished,
}

impl PublicationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Unpublished => "unpublished",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(Self::Published),
            "unpublished" => Ok(Self::Unpublished),
            other => Err(DomainError::Validation(format!(
                "unknown publication state '{}'",
                other
            ))),
        }
    }
}

/// How often the plan price is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    OneTime,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::OneTime => "one_time",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            "one_time" => Ok(Self::OneTime),
            other => Err(DomainError::Validation(format!(
                "unknown billing period '{}'",
                other
            ))),
        }
    }
}

/// A named service package offered on the site
#[derive(Debug, Clone, PartialEq)]
pub struct TariffPlan {
    /// Server-assigned, immutable (`tp_<hex>`)
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor currency units (kopecks, cents)
    pub price: i64,
    /// ISO 4217 code
    pub currency: String,
    pub billing_period: BillingPeriod,
    pub features: Vec<String>,
    pub publication_state: PublicationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TariffPlan {
    pub fn generate_id() -> String {
        format!("tp_{}", Uuid::new_v4().simple())
    }

    pub fn is_published(&self) -> bool {
        self.publication_state.is_published()
    }

    /// Check the field rules every stored plan must satisfy.
    pub fn validate(&self) -> DomainResult<()> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        } else if self.name.chars().count() > MAX_NAME_LEN {
            problems.push(format!("name must be at most {} characters", MAX_NAME_LEN));
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                problems.push(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                ));
            }
        }

        if self.price < 0 {
            problems.push("price must be non-negative".to_string());
        }

        if !is_currency_code(&self.currency) {
            problems.push("currency must be a 3-letter upper-case ISO 4217 code".to_string());
        }

        if self.features.len() > MAX_FEATURES {
            problems.push(format!("at most {} features are allowed", MAX_FEATURES));
        }
        for (idx, feature) in self.features.iter().enumerate() {
            if feature.trim().is_empty() {
                problems.push(format!("features[{}] must not be empty", idx));
            } else if feature.chars().count() > MAX_FEATURE_LEN {
                problems.push(format!(
                    "features[{}] must be at most {} characters",
                    idx, MAX_FEATURE_LEN
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems.join("; ")))
        }
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Fields an admin list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffPlanSortField {
    Name,
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
    PublicationState,
}

impl TariffPlanSortField {
    /// Compare two plans on this field, breaking ties by id so the order is stable.
    pub fn compare(&self, a: &TariffPlan, b: &TariffPlan) -> Ordering {
        let primary = match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Price => a.price.cmp(&b.price),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::PublicationState => a
                .publication_state
                .as_str()
                .cmp(b.publication_state.as_str()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> TariffPlan {
        TariffPlan {
            id: "tp_1".into(),
            name: "Basic".into(),
            description: None,
            price: 1000,
            currency: "RUB".into(),
            billing_period: BillingPeriod::Monthly,
            features: vec!["1C:Accounting support".into()],
            publication_state: PublicationState::Unpublished,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_plan_passes() {
        assert!(sample_plan().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut plan = sample_plan();
        plan.name = "   ".into();
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut plan = sample_plan();
        plan.price = -1;
        assert!(matches!(plan.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn zero_price_is_allowed() {
        let mut plan = sample_plan();
        plan.price = 0;
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn currency_must_be_iso_code() {
        let mut plan = sample_plan();
        plan.currency = "rub".into();
        assert!(plan.validate().is_err());
        plan.currency = "RUBL".into();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut plan = sample_plan();
        plan.name = String::new();
        plan.price = -5;
        plan.features = vec!["".into()];
        let msg = plan.validate().unwrap_err().to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("price"));
        assert!(msg.contains("features[0]"));
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = TariffPlan::generate_id();
        let b = TariffPlan::generate_id();
        assert!(a.starts_with("tp_"));
        assert_eq!(a.len(), 3 + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn publication_state_round_trips_through_str() {
        for state in [PublicationState::Published, PublicationState::Unpublished] {
            assert_eq!(state.as_str().parse::<PublicationState>().unwrap(), state);
        }
        assert!("draft".parse::<PublicationState>().is_err());
        assert_eq!(PublicationState::default(), PublicationState::Unpublished);
    }

    #[test]
    fn billing_period_parses_snake_case() {
        assert_eq!("one_time".parse::<BillingPeriod>().unwrap(), BillingPeriod::OneTime);
        assert!("weekly".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn sort_ties_break_on_id() {
        let a = sample_plan();
        let mut b = sample_plan();
        b.id = "tp_2".into();
        assert_eq!(TariffPlanSortField::Price.compare(&a, &b), Ordering::Less);
    }
}
