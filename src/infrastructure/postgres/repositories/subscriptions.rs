use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::exists, insert_into, prelude::*, select, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order((subscriptions::created_at.desc(), subscriptions::id.desc()))
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_active_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::is_active.eq(true))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn supersede(
        &self,
        subscription_id: i64,
        replacement: InsertSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
            let deactivated = update(subscriptions::table)
                .filter(subscriptions::id.eq(subscription_id))
                .filter(subscriptions::is_active.eq(true))
                .set(subscriptions::is_active.eq(false))
                .execute(conn)?;

            if deactivated == 0 {
                return Ok(None);
            }

            let created = insert_into(subscriptions::table)
                .values(&replacement)
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(conn)?;

            Ok(Some(created))
        })?;

        Ok(result)
    }

    async fn deactivate(&self, subscription_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::is_active.eq(true))
            .set(subscriptions::is_active.eq(false))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn exists_for_magazine(&self, magazine_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = select(exists(
            subscriptions::table.filter(subscriptions::magazine_id.eq(magazine_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(result)
    }

    async fn exists_for_plan(&self, plan_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = select(exists(
            subscriptions::table.filter(subscriptions::plan_id.eq(plan_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(result)
    }
}
