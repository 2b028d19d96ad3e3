use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        plans::PlanEntity,
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    value_objects::validation::{ValidationError, require_non_negative},
};

/// Renewal period applied to the replacement row written by a modification.
pub const MODIFIED_SUBSCRIPTION_RENEWAL_DAYS: i64 = 30;

pub fn renewal_date(
    starts_at: DateTime<Utc>,
    period_days: i64,
) -> Result<DateTime<Utc>, ValidationError> {
    Duration::try_days(period_days)
        .and_then(|period| starts_at.checked_add_signed(period))
        .ok_or_else(|| {
            ValidationError(format!(
                "a {period_days} day renewal period falls outside the supported date range"
            ))
        })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: i64,
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
    pub price: f64,
    pub renewal_date: DateTime<Utc>,
    pub is_active: bool,
    pub previous_subscription_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            magazine_id: entity.magazine_id,
            plan_id: entity.plan_id,
            price: entity.price,
            renewal_date: entity.renewal_date,
            is_active: entity.is_active,
            previous_subscription_id: entity.previous_subscription_id,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertSubscriptionModel {
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
}

impl InsertSubscriptionModel {
    /// Price is taken from the plan as it stands now; later plan edits do not touch it.
    pub fn to_entity(
        &self,
        plan: &PlanEntity,
        now: DateTime<Utc>,
    ) -> Result<InsertSubscriptionEntity, ValidationError> {
        Ok(InsertSubscriptionEntity {
            user_id: self.user_id,
            magazine_id: self.magazine_id,
            plan_id: plan.id,
            price: plan.price,
            renewal_date: renewal_date(now, i64::from(plan.renewal_period_days))?,
            is_active: true,
            previous_subscription_id: None,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditSubscriptionModel {
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
    pub price: f64,
}

impl EditSubscriptionModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("price", self.price)
    }

    pub fn to_entity(
        &self,
        superseded_id: i64,
        now: DateTime<Utc>,
    ) -> Result<InsertSubscriptionEntity, ValidationError> {
        Ok(InsertSubscriptionEntity {
            user_id: self.user_id,
            magazine_id: self.magazine_id,
            plan_id: self.plan_id,
            price: self.price,
            renewal_date: renewal_date(now, MODIFIED_SUBSCRIPTION_RENEWAL_DAYS)?,
            is_active: true,
            previous_subscription_id: Some(superseded_id),
            created_at: now,
        })
    }
}
