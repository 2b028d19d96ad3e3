use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::plans;

/// Plan row. `tier` is stored as text and parsed into `PlanTier` at the model boundary.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    pub tier: String,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    pub tier: String,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plans)]
pub struct EditPlanEntity {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub renewal_period_days: i32,
    pub tier: String,
    pub discount: f64,
    pub updated_at: DateTime<Utc>,
}
