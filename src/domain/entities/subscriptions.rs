use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::subscriptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
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

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
    pub price: f64,
    pub renewal_date: DateTime<Utc>,
    pub is_active: bool,
    pub previous_subscription_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
