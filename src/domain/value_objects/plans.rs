use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::plans::{EditPlanEntity, InsertPlanEntity, PlanEntity},
    value_objects::{
        enums::plan_tiers::PlanTier,
        validation::{ValidationError, require_discount, require_non_empty, require_non_negative},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    pub tier: PlanTier,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanModel {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            price: entity.price,
            renewal_period_days: entity.renewal_period_days,
            tier: PlanTier::from_stored(&entity.tier),
            discount: entity.discount,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPlanModel {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    #[serde(default)]
    pub tier: PlanTier,
    #[serde(default)]
    pub discount: f64,
}

impl InsertPlanModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, self.price, self.renewal_period_days, self.discount)
    }

    pub fn to_entity(&self) -> InsertPlanEntity {
        let now = Utc::now();
        InsertPlanEntity {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            renewal_period_days: self.renewal_period_days,
            tier: self.tier.to_string(),
            discount: self.discount,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPlanModel {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    #[serde(default)]
    pub tier: PlanTier,
    #[serde(default)]
    pub discount: f64,
}

impl EditPlanModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, self.price, self.renewal_period_days, self.discount)
    }

    pub fn to_entity(&self) -> EditPlanEntity {
        EditPlanEntity {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            renewal_period_days: self.renewal_period_days,
            tier: self.tier.to_string(),
            discount: self.discount,
            updated_at: Utc::now(),
        }
    }
}

/// Roughly a century.
pub const MAX_RENEWAL_PERIOD_DAYS: i32 = 36_500;

fn validate_fields(
    title: &str,
    price: f64,
    renewal_period_days: i32,
    discount: f64,
) -> Result<(), ValidationError> {
    require_non_empty("title", title)?;
    require_non_negative("price", price)?;
    if !(1..=MAX_RENEWAL_PERIOD_DAYS).contains(&renewal_period_days) {
        return Err(ValidationError(format!(
            "renewal_period_days must be between 1 and {MAX_RENEWAL_PERIOD_DAYS}"
        )));
    }
    require_discount(discount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> InsertPlanModel {
        InsertPlanModel {
            title: "Gold".to_string(),
            description: "Monthly print + digital".to_string(),
            price: 9.99,
            renewal_period_days: 30,
            tier: PlanTier::Premium,
            discount: 0.0,
        }
    }

    #[test]
    fn accepts_a_well_formed_plan() {
        assert!(gold().validate().is_ok());
    }

    #[test]
    fn rejects_zero_day_renewal_period() {
        let plan = InsertPlanModel {
            renewal_period_days: 0,
            ..gold()
        };
        assert!(plan.validate().is_err());
    }

    #[test]
    fn rejects_renewal_period_beyond_a_century() {
        let plan = InsertPlanModel {
            renewal_period_days: 100_000_000,
            ..gold()
        };
        assert_eq!(
            plan.validate(),
            Err(ValidationError(
                "renewal_period_days must be between 1 and 36500".to_string()
            ))
        );

        let edit = EditPlanModel {
            title: "Gold".to_string(),
            description: "d".to_string(),
            price: 9.99,
            renewal_period_days: MAX_RENEWAL_PERIOD_DAYS + 1,
            tier: PlanTier::Premium,
            discount: 0.0,
        };
        assert!(edit.validate().is_err());

        let longest = InsertPlanModel {
            renewal_period_days: MAX_RENEWAL_PERIOD_DAYS,
            ..gold()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn tier_defaults_to_basic_when_omitted() {
        let plan: InsertPlanModel = serde_json::from_str(
            r#"{"title":"Lite","description":"d","price":1.0,"renewal_period_days":7}"#,
        )
        .unwrap();
        assert_eq!(plan.tier, PlanTier::Basic);
        assert_eq!(plan.discount, 0.0);
        assert_eq!(plan.to_entity().tier, "basic");
    }
}
